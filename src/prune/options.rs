/// Options for controlling row-group pruning behavior
#[derive(Clone, Debug)]
pub struct PruneOptions {
    enable_membership_filter: bool,
    enable_histogram: bool,
}

impl PruneOptions {
    /// Create a new builder for PruneOptions
    ///
    /// # Example
    /// ```
    /// use sieve::PruneOptions;
    ///
    /// let options = PruneOptions::builder()
    ///     .enable_membership_filter(true)
    ///     .enable_histogram(false)
    ///     .build();
    /// ```
    pub fn builder() -> PruneOptionsBuilder {
        PruneOptionsBuilder::default()
    }

    /// Check if membership-filter refinement is enabled
    pub fn enable_membership_filter(&self) -> bool {
        self.enable_membership_filter
    }

    /// Check if histogram refinement is enabled
    pub fn enable_histogram(&self) -> bool {
        self.enable_histogram
    }
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            enable_membership_filter: true,
            enable_histogram: true,
        }
    }
}

/// Builder for PruneOptions
#[derive(Clone, Debug, Default)]
pub struct PruneOptionsBuilder {
    enable_membership_filter: Option<bool>,
    enable_histogram: Option<bool>,
}

impl PruneOptionsBuilder {
    /// Enable or disable membership-filter refinement (default: true)
    ///
    /// When enabled, equality predicates additionally probe the column's
    /// membership filter; the filter's no-false-negative guarantee makes
    /// a negative probe a sound reason to drop a row group.
    pub fn enable_membership_filter(mut self, value: bool) -> Self {
        self.enable_membership_filter = Some(value);
        self
    }

    /// Enable or disable histogram refinement (default: true)
    ///
    /// When enabled, ordering predicates additionally consult the
    /// column's histogram, a finer-grained necessary condition than the
    /// min/max check alone.
    pub fn enable_histogram(mut self, value: bool) -> Self {
        self.enable_histogram = Some(value);
        self
    }

    /// Build the PruneOptions
    pub fn build(self) -> PruneOptions {
        PruneOptions {
            enable_membership_filter: self.enable_membership_filter.unwrap_or(true),
            enable_histogram: self.enable_histogram.unwrap_or(true),
        }
    }
}
