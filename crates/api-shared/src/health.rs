use crate::wire::HealthRes;

/// Simple health service for the HTTP API
///
/// Reports that the process is up and serving requests. It does not probe the store or the
/// summarisation service.
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "DXReport is alive".into(),
        }
    }
}
