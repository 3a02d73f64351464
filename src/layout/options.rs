//! Sizing options controlling how heights are measured and which geometry
//! the calculator is allowed to mutate along the way.

/// A single sizing option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingOption {
    /// Measure against the compressed fitting extent instead of the expanded one
    CompressedFit,
    /// Let the node's current frame height compete with the measured height
    PreferExplicitSize,
    /// Let the sum of the node's children compete with the measured height
    PreferChildSum,
    /// Break ties with the minimum instead of the maximum
    UseMinimum,
    /// Add each child's y origin when summing children
    IncludeYOffset,
    /// Deactivate the node's active constraints while measuring
    SuspendConstraints,
    /// Set each child's y to the running total before measuring it
    StackVertically,
    /// Set the node's width
    StretchWidth(f64),
    /// Set the node's x to zero
    AlignLeft,
    /// Center the node horizontally within the given extent
    AlignCenterIn(f64),
    /// Align the node's trailing edge with the given extent
    AlignRightIn(f64),
}

/// Horizontal placement applied to a node before it is measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    Left,
    Right(f64),
    Center(f64),
}

/// Flags resolved from a sequence of options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizingPolicy {
    pub compressed_fit: bool,
    pub prefer_explicit: bool,
    pub prefer_child_sum: bool,
    pub use_minimum: bool,
    pub suspend_constraints: bool,
    pub include_y_offset: bool,
    pub stack: bool,
    pub alignment: Option<Alignment>,
    pub width_override: Option<f64>,
}

impl SizingPolicy {
    /// True when resolving this policy changes the node's x or width
    pub fn mutates_geometry(&self) -> bool {
        self.width_override.is_some() || self.alignment.is_some()
    }

    /// Combine candidate heights using the configured tie-break
    pub fn pick(&self, candidates: &[f64]) -> f64 {
        let fold = if self.use_minimum { f64::min } else { f64::max };
        candidates
            .iter()
            .copied()
            .reduce(fold)
            .unwrap_or_default()
    }
}

/// An ordered list of sizing options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SizingOptions(Vec<SizingOption>);

impl SizingOptions {
    pub fn new(options: impl IntoIterator<Item = SizingOption>) -> Self {
        Self(options.into_iter().collect())
    }

    /// Suspend constraints only
    pub fn defaults() -> Self {
        Self::new([SizingOption::SuspendConstraints])
    }

    pub fn compressed_size() -> Self {
        Self::new([SizingOption::CompressedFit, SizingOption::SuspendConstraints])
    }

    pub fn subview_sums() -> Self {
        Self::new([SizingOption::PreferChildSum, SizingOption::SuspendConstraints])
    }

    pub fn subview_sums_with_y() -> Self {
        Self::subview_sums().adding([SizingOption::IncludeYOffset])
    }

    pub fn stack_views() -> Self {
        Self::new([
            SizingOption::SuspendConstraints,
            SizingOption::StackVertically,
            SizingOption::AlignLeft,
        ])
    }

    /// Like [`SizingOptions::stack_views`] but stretches every node to `width`
    pub fn stack_and_stretch(width: f64) -> Self {
        Self::new([
            SizingOption::SuspendConstraints,
            SizingOption::StackVertically,
            SizingOption::StretchWidth(width),
        ])
    }

    /// Append options
    pub fn adding(&self, options: impl IntoIterator<Item = SizingOption>) -> Self {
        let mut result = self.clone();
        result.0.extend(options);
        result
    }

    /// Remove the first exact match of each option; absent options are ignored
    pub fn except(&self, options: impl IntoIterator<Item = SizingOption>) -> Self {
        let mut result = self.clone();
        for option in options {
            if let Some(index) = result.0.iter().position(|o| *o == option) {
                result.0.remove(index);
            }
        }
        result
    }

    pub fn contains(&self, option: SizingOption) -> bool {
        self.0.contains(&option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SizingOption> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve the options in a single pass
    ///
    /// Flags are set by presence. Valued options keep the last value seen.
    /// Alignment precedence is left, then right, then center.
    pub fn resolve(&self) -> SizingPolicy {
        let mut policy = SizingPolicy::default();
        let mut align_left = false;
        let mut align_right = None;
        let mut align_center = None;

        for option in &self.0 {
            match *option {
                SizingOption::CompressedFit => policy.compressed_fit = true,
                SizingOption::PreferExplicitSize => policy.prefer_explicit = true,
                SizingOption::PreferChildSum => policy.prefer_child_sum = true,
                SizingOption::UseMinimum => policy.use_minimum = true,
                SizingOption::IncludeYOffset => policy.include_y_offset = true,
                SizingOption::SuspendConstraints => policy.suspend_constraints = true,
                SizingOption::StackVertically => policy.stack = true,
                SizingOption::StretchWidth(width) => policy.width_override = Some(width),
                SizingOption::AlignLeft => align_left = true,
                SizingOption::AlignRightIn(extent) => align_right = Some(extent),
                SizingOption::AlignCenterIn(extent) => align_center = Some(extent),
            }
        }

        policy.alignment = if align_left {
            Some(Alignment::Left)
        } else if let Some(extent) = align_right {
            Some(Alignment::Right(extent))
        } else {
            align_center.map(Alignment::Center)
        };

        policy
    }
}

impl From<Vec<SizingOption>> for SizingOptions {
    fn from(options: Vec<SizingOption>) -> Self {
        Self(options)
    }
}

impl<const N: usize> From<[SizingOption; N]> for SizingOptions {
    fn from(options: [SizingOption; N]) -> Self {
        Self::new(options)
    }
}

impl FromIterator<SizingOption> for SizingOptions {
    fn from_iter<T: IntoIterator<Item = SizingOption>>(iter: T) -> Self {
        Self::new(iter)
    }
}
