//! Custom resources mirrored into Konnect.

mod certificate;
mod consumer;
mod control_plane;
mod key;
mod plugin;
mod service;
mod status;
mod upstream;

pub use certificate::*;
pub use consumer::*;
pub use control_plane::*;
pub use key::*;
pub use plugin::*;
pub use service::*;
pub use status::*;
pub use upstream::*;

pub const KONNECT_GROUP: &str = "konnect.konghq.com";
pub const CONFIGURATION_GROUP: &str = "configuration.konghq.com";

/// Access to the status block every managed kind carries.
pub trait HasKonnectStatus {
    fn konnect_status(&self) -> Option<&KonnectStatus>;

    fn konnect_status_mut(&mut self) -> &mut KonnectStatus;

    fn konnect_id(&self) -> &str {
        self.konnect_status()
            .map(|s| s.konnect.id.as_str())
            .unwrap_or_default()
    }

    fn control_plane_id(&self) -> &str {
        self.konnect_status()
            .map(|s| s.konnect.control_plane_id.as_str())
            .unwrap_or_default()
    }

    fn parent_id(&self) -> &str {
        self.konnect_status()
            .map(|s| s.konnect.parent_id.as_str())
            .unwrap_or_default()
    }

    fn conditions(&self) -> &[Condition] {
        self.konnect_status()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

macro_rules! impl_konnect_status {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl HasKonnectStatus for $kind {
                fn konnect_status(&self) -> Option<&KonnectStatus> {
                    self.status.as_ref()
                }

                fn konnect_status_mut(&mut self) -> &mut KonnectStatus {
                    self.status.get_or_insert_with(KonnectStatus::default)
                }
            }
        )+
    };
}

impl_konnect_status!(
    KonnectGatewayControlPlane,
    KongService,
    KongRoute,
    KongConsumer,
    KongConsumerGroup,
    KongCredentialAPIKey,
    KongCredentialBasicAuth,
    KongUpstream,
    KongCertificate,
    KongCACertificate,
    KongKeySet,
    KongKey,
    KongPluginBinding,
);
