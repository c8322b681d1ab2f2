//! URL routes the host mounts for this provider. The handlers themselves
//! belong to the host.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteScope {
    /// Mounted under each event's URL prefix.
    Event,
    /// Mounted once for the whole installation.
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub scope: RouteScope,
    /// Whether the route answers only while the event shop is live.
    pub require_live: bool,
}

pub const ROUTES: &[Route] = &[
    Route {
        name: "return",
        path: "mbway_via_ifthenpay/return/",
        scope: RouteScope::Event,
        require_live: true,
    },
    Route {
        name: "webhook",
        path: "mbway_via_ifthenpay/webhook/",
        scope: RouteScope::Event,
        require_live: false,
    },
    Route {
        name: "webhook",
        path: "_mbway_via_ifthenpay/webhook/",
        scope: RouteScope::Global,
        require_live: false,
    },
];

pub fn routes(scope: RouteScope) -> impl Iterator<Item = &'static Route> {
    ROUTES.iter().filter(move |r| r.scope == scope)
}
