/// Coarse classification of a [`ProvidersError`](super::ProvidersError).
///
/// Callers map kinds onto their own failure surface (HTTP status, exit code)
/// instead of matching on individual variants.
///
/// | Kind | Meaning |
/// |------|---------|
/// | `Validation` | Upstream answered, but the payload did not match the expected schema |
/// | `Upstream` | Upstream could not be reached or answered with a failure status |
/// | `Configuration` | Local setup is incomplete (missing key, invalid catalog) |
/// | `Input` | The caller supplied an unusable request |
/// | `NotFound` | The request was valid but nothing matched |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Upstream,
    Configuration,
    Input,
    NotFound,
}

impl ErrorKind {
    /// Whether the failure originates on the far side of the upstream call.
    pub fn is_upstream_failure(self) -> bool {
        matches!(self, Self::Validation | Self::Upstream)
    }
}
