/// What to do with sites that fall outside the bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutOfBoundsPolicy {
    /// Fail construction with
    /// [`VoronoiError::SiteOutOfBounds`](crate::VoronoiError::SiteOutOfBounds).
    #[default]
    Reject,
    /// Drop the site with a warning and build the diagram from the rest.
    Exclude,
}

/// Options for [`VoronoiDiagram::with_config`](crate::VoronoiDiagram::with_config).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagramConfig {
    pub out_of_bounds: OutOfBoundsPolicy,
    /// Build cells on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            out_of_bounds: OutOfBoundsPolicy::Reject,
            parallel: true,
        }
    }
}

impl DiagramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_of_bounds(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds = policy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
