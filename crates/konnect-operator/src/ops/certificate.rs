use serde::Serialize;

use crate::{
    crd::{EntityRef, KongCACertificate, KongCertificate},
    entity::KonnectEntity,
    refs::NoParent,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateInput {
    pub cert: String,
    pub key: String,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongCertificate {
    type Input = CertificateInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongCertificate";
    const COLLECTION: &'static str = "certificates";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> CertificateInput {
        CertificateInput {
            cert: self.spec.cert.clone(),
            key: self.spec.key.clone(),
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CACertificateInput {
    pub cert: String,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongCACertificate {
    type Input = CACertificateInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongCACertificate";
    const COLLECTION: &'static str = "ca_certificates";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> CACertificateInput {
        CACertificateInput {
            cert: self.spec.cert.clone(),
            tags,
        }
    }
}
