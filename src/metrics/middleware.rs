use std::future::{Ready, ready};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;

use crate::metrics::AppMetrics;

/// Label used for requests that matched no route
const UNMATCHED: &str = "unmatched";

/// Records count, latency and in-flight requests per route pattern
pub struct MetricsMiddleware {
    metrics: AppMetrics,
}

impl MetricsMiddleware {
    pub fn new(metrics: AppMetrics) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct MetricsService<S> {
    service: S,
    metrics: AppMetrics,
}

/// Keeps the in-flight gauge balanced even when the response future is dropped
struct InFlight(AppMetrics);

impl InFlight {
    fn enter(metrics: &AppMetrics) -> Self {
        metrics.http_request_start();
        Self(metrics.clone())
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.http_request_end();
    }
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        // route pattern keeps label cardinality bounded
        let route = req
            .match_pattern()
            .unwrap_or_else(|| UNMATCHED.to_string());

        let guard = InFlight::enter(&self.metrics);
        let metrics = self.metrics.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await;
            drop(guard);

            let res = res?;

            metrics.record_http_request(
                &method,
                &route,
                res.status().as_u16(),
                started.elapsed().as_secs_f64(),
            );

            Ok(res)
        })
    }
}
