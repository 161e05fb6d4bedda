use crate::bridge::model::BridgeModel;
use crate::export::codes::ExportBundle;
use crate::workflow::config::PlanConfig;
use crate::workflow::runner::Runner;
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<BridgeModel>>;

pub fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn read_model(state: &SharedModel) -> RwLockReadGuard<'_, BridgeModel> {
    state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_model(state: &SharedModel) -> RwLockWriteGuard<'_, BridgeModel> {
    state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Bridge that serves synthesized codes to the radar control chain.
pub struct HttpBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl HttpBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(BridgeModel::new())),
            runner,
        }
    }

    /// `GET /waveform` returns the model; `POST /synthesize` runs a plan.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("waveform")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| warp::reply::json(&*read_model(&state)));

        let post_route = warp::path("synthesize")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .map(|plan: PlanConfig, state: SharedModel, runner: Arc<Runner>| {
                match runner.execute(&plan) {
                    Ok(result) => {
                        let bundle = ExportBundle::from(result);
                        let reply = warp::reply::json(&json!({
                            "status": "ok",
                            "summary": bundle.summary,
                        }));
                        let mut guard = write_model(&state);
                        guard.latest = Some(bundle);
                        guard.synthesized += 1;
                        warp::reply::with_status(reply, StatusCode::OK)
                    }
                    Err(err) => {
                        warn!("synthesize request rejected: {:#}", err);
                        write_model(&state).rejected += 1;
                        warp::reply::with_status(
                            warp::reply::json(&json!({
                                "status": "error",
                                "error": format!("{:#}", err),
                            })),
                            StatusCode::BAD_REQUEST,
                        )
                    }
                }
            });

        get_route.or(post_route)
    }

    /// Starts serving on a background thread with its own runtime.
    pub fn serve(&self, addr: SocketAddr) {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            info!("HTTP bridge listening on {}", addr);
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, bundle: ExportBundle) {
        let mut guard = write_model(&self.state);
        info!(
            "publishing {} samples ({} profiles)",
            bundle.summary.total_samples, bundle.summary.profile_count
        );
        guard.latest = Some(bundle);
        guard.synthesized += 1;
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> BridgeModel {
        read_model(&self.state).clone()
    }
}
