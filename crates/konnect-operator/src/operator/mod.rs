mod backoff;
mod finalizer;
mod reconcile;

use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Context;
use futures::StreamExt;
use konnect_common::settings::{OperatorArgs, Settings};
use kube::{
    runtime::{
        controller::{self, Controller},
        watcher,
    },
    Api, Client,
};
use tracing::info;

pub use finalizer::KONNECT_CLEANUP_FINALIZER;
pub use reconcile::{on_error, reconcile, ContextData};

use crate::{
    crd::{
        KongCACertificate, KongCertificate, KongConsumer, KongConsumerGroup,
        KongCredentialAPIKey, KongCredentialBasicAuth, KongKey, KongKeySet, KongPlugin,
        KongPluginBinding, KongRoute, KongService, KongUpstream, KonnectGatewayControlPlane,
    },
    entity::KonnectEntity,
    error::OperatorResult,
    refs::{bindings_of, children_of, in_control_plane, ChildEntity},
    sdk::{KonnectClient, KonnectSdk},
    store::{KubeApiStore, NamespacedObject},
};

type ControllerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type SharedContext = Arc<ContextData<KubeApiStore>>;

/// Runs one controller per managed kind until SIGTERM/SIGINT.
pub async fn operator(settings: &Settings) -> OperatorResult {
    let client = Client::try_default().await?;
    let sdk: Arc<dyn KonnectSdk> = Arc::new(
        KonnectClient::new(
            settings.konnect.server_url.as_str(),
            settings.konnect.token.as_str(),
            settings.konnect.request_timeout(),
        )
        .context("invalid Konnect client settings")?,
    );
    let args = &settings.operator;
    let ctx = Arc::new(ContextData::new(
        KubeApiStore::new(client.clone()),
        sdk,
        args,
    ));

    info!(
        server_url = %settings.konnect.server_url,
        namespace = args.namespace.as_deref().unwrap_or("*"),
        concurrency = args.concurrency,
        "starting Konnect controllers"
    );

    let controllers: Vec<ControllerFuture> = vec![
        run(base_controller::<KonnectGatewayControlPlane>(&client, args), &ctx),
        run(scoped::<KongService>(&client, args), &ctx),
        run(
            watch_parent::<KongRoute, KongService>(scoped(&client, args), &client, args),
            &ctx,
        ),
        run(scoped::<KongConsumer>(&client, args), &ctx),
        run(scoped::<KongConsumerGroup>(&client, args), &ctx),
        run(
            watch_parent::<KongCredentialAPIKey, KongConsumer>(
                base_controller(&client, args),
                &client,
                args,
            ),
            &ctx,
        ),
        run(
            watch_parent::<KongCredentialBasicAuth, KongConsumer>(
                base_controller(&client, args),
                &client,
                args,
            ),
            &ctx,
        ),
        run(scoped::<KongUpstream>(&client, args), &ctx),
        run(scoped::<KongCertificate>(&client, args), &ctx),
        run(scoped::<KongCACertificate>(&client, args), &ctx),
        run(scoped::<KongKeySet>(&client, args), &ctx),
        run(
            watch_parent::<KongKey, KongKeySet>(scoped(&client, args), &client, args),
            &ctx,
        ),
        run(plugin_bindings(&client, args), &ctx),
    ];

    futures::future::join_all(controllers).await;
    info!("controllers stopped");
    Ok(())
}

fn api<K: NamespacedObject>(client: &Client, args: &OperatorArgs) -> Api<K> {
    match &args.namespace {
        Some(namespace) => Api::namespaced(client.clone(), namespace),
        None => Api::all(client.clone()),
    }
}

fn base_controller<K: KonnectEntity>(client: &Client, args: &OperatorArgs) -> Controller<K> {
    Controller::new(api::<K>(client, args), watcher::Config::default())
        .with_config(controller::Config::default().concurrency(args.concurrency))
}

/// Controller that is also woken up by the control planes its objects reference.
fn scoped<K: KonnectEntity>(client: &Client, args: &OperatorArgs) -> Controller<K> {
    let controller = base_controller::<K>(client, args);
    let store = controller.store();
    controller.watches(
        api::<KonnectGatewayControlPlane>(client, args),
        watcher::Config::default(),
        move |cp| in_control_plane(&cp, &store.state()),
    )
}

fn watch_parent<K, P>(controller: Controller<K>, client: &Client, args: &OperatorArgs) -> Controller<K>
where
    K: ChildEntity<P>,
    P: KonnectEntity,
{
    let store = controller.store();
    controller.watches(api::<P>(client, args), watcher::Config::default(), move |parent| {
        children_of(&parent, &store.state())
    })
}

/// Bindings are woken up by their plugin, every target kind and the control plane.
fn plugin_bindings(client: &Client, args: &OperatorArgs) -> Controller<KongPluginBinding> {
    let controller = scoped::<KongPluginBinding>(client, args);
    let controller = watch_parent::<_, KongService>(controller, client, args);
    let controller = watch_parent::<_, KongRoute>(controller, client, args);
    let controller = watch_parent::<_, KongConsumer>(controller, client, args);
    let store = controller.store();
    controller.watches(api::<KongPlugin>(client, args), watcher::Config::default(), move |plugin| {
        bindings_of(&plugin, &store.state())
    })
}

fn run<K: KonnectEntity>(controller: Controller<K>, ctx: &SharedContext) -> ControllerFuture {
    info!("- {} controller", K::KIND);
    Box::pin(
        controller
            .shutdown_on_signal()
            .run(reconcile::<K, KubeApiStore>, on_error::<K, KubeApiStore>, ctx.clone())
            .for_each(log_reconcile_result(K::KIND)),
    )
}

fn log_reconcile_result<T: std::fmt::Debug, E: std::fmt::Debug>(
    kind: &'static str,
) -> impl Fn(Result<T, E>) -> std::future::Ready<()> {
    move |result| {
        match result {
            Ok(action) => tracing::debug!(?action, "{} reconciliation completed", kind),
            Err(e) => tracing::debug!(error = ?e, "{} reconciliation error", kind),
        }
        std::future::ready(())
    }
}
