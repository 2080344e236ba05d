//! Small declarative helpers shared by the workspace binaries.

#[cfg(feature = "actix")]
pub use actix_web;

/// Generate a `routes` function registering handlers and nested route modules
///
/// ```ignore
/// macros_utils::routes! {
///     route health_route,
///     module metrics,
/// }
/// // expands to
/// pub fn routes(cfg: &mut actix_web::web::ServiceConfig) {
///     cfg.service(health_route);
///     metrics::routes(cfg);
/// }
/// ```
#[cfg(feature = "actix")]
#[macro_export]
macro_rules! routes {
    (@register $cfg:ident, route $item:ident) => {
        $cfg.service($item);
    };
    (@register $cfg:ident, module $item:ident) => {
        $item::routes($cfg);
    };
    ($($kind:ident $item:ident),* $(,)?) => {
        pub fn routes(cfg: &mut $crate::actix_web::web::ServiceConfig) {
            $($crate::routes!(@register cfg, $kind $item);)*
        }
    };
}
