use serde::Serialize;

use super::{id_ref, IdRef};
use crate::{
    conditions::SERVICE_REF_VALID,
    crd::{EntityRef, HasKonnectStatus, KongRoute, KongService},
    entity::KonnectEntity,
    refs::{ChildEntity, NoParent, Parent},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongService {
    type Input = ServiceInput;
    type Parent = NoParent;

    const KIND: &'static str = "KongService";
    const COLLECTION: &'static str = "services";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> ServiceInput {
        ServiceInput {
            name: self.spec.name.clone(),
            host: self.spec.host.clone(),
            port: self.spec.port,
            protocol: self.spec.protocol.clone(),
            path: self.spec.path.clone(),
            enabled: self.spec.enabled,
            tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_path: Option<bool>,
    /// Service-less routes are allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<IdRef>,
    pub tags: Vec<String>,
}

impl KonnectEntity for KongRoute {
    type Input = RouteInput;
    type Parent = Parent<KongService>;

    const KIND: &'static str = "KongRoute";
    const COLLECTION: &'static str = "routes";

    fn spec_tags(&self) -> &[String] {
        &self.spec.tags
    }

    fn control_plane_ref(&self) -> Option<&EntityRef> {
        self.spec.control_plane_ref.as_ref()
    }

    fn to_input(&self, tags: Vec<String>) -> RouteInput {
        RouteInput {
            name: self.spec.name.clone(),
            paths: self.spec.paths.clone(),
            hosts: self.spec.hosts.clone(),
            methods: self.spec.methods.clone(),
            protocols: self.spec.protocols.clone(),
            strip_path: self.spec.strip_path,
            service: id_ref(self.parent_id()),
            tags,
        }
    }
}

impl ChildEntity<KongService> for KongRoute {
    const REF_CONDITION: &'static str = SERVICE_REF_VALID;

    fn parent_ref(&self) -> Option<EntityRef> {
        self.spec.service_ref.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        crd::KongRouteSpec,
        testing::{meta, with_konnect},
    };
    use serde_json::json;

    fn route(service_id: &str) -> KongRoute {
        let mut route = KongRoute::new(
            "route-1",
            KongRouteSpec {
                service_ref: Some(EntityRef::namespaced("svc-1")),
                paths: vec!["/echo".to_string()],
                ..Default::default()
            },
        );
        route.metadata = meta("route-1", "default");
        let mut route = with_konnect(route, "", "cp-1");
        route.konnect_status_mut().konnect.parent_id = service_id.to_string();
        route
    }

    #[test]
    fn test_route_body_references_resolved_service() {
        let body = serde_json::to_value(route("svc-id").to_input(vec![])).unwrap();

        assert_eq!(body["service"], json!({"id": "svc-id"}));
        assert_eq!(body["paths"], json!(["/echo"]));
        assert!(body.get("hosts").is_none());
    }

    #[test]
    fn test_service_less_route_omits_service() {
        let body = serde_json::to_value(route("").to_input(vec![])).unwrap();

        assert!(body.get("service").is_none());
    }

    #[test]
    fn test_route_references_service_by_name() {
        let route = route("");

        assert!(ChildEntity::<KongService>::references(&route, "svc-1"));
        assert!(!ChildEntity::<KongService>::references(&route, "svc-2"));
    }
}
