//! Navigation guard for the client's route table.
//!
//! [`evaluate`] is a pure function from (target route, session state) to a
//! [`Navigation`] decision; it runs before every navigation. It never does
//! I/O: an unsettled session yields [`Navigation::AwaitSession`] and the
//! caller restores the session and evaluates again.

use auth::{Role, SessionState};

/// Every navigable view in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteId {
    Home,
    Login,
    Unauthorized,
    Parts,
    PartNew,
    PartEdit,
    Records,
    RecordNew,
    RecordEdit,
}

impl RouteId {
    pub fn path(self) -> &'static str {
        match self {
            RouteId::Home => "/",
            RouteId::Login => "/login",
            RouteId::Unauthorized => "/unauthorized",
            RouteId::Parts => "/parts",
            RouteId::PartNew => "/parts/new",
            RouteId::PartEdit => "/parts/:id/edit",
            RouteId::Records => "/records",
            RouteId::RecordNew => "/records/new",
            RouteId::RecordEdit => "/records/:id/edit",
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, RouteId::Login | RouteId::Unauthorized)
    }

    /// The role a route is gated on, if any.
    pub fn required_role(self) -> Option<Role> {
        match self {
            RouteId::Parts | RouteId::PartNew | RouteId::PartEdit => Some(Role::Parts),
            RouteId::Records | RouteId::RecordNew | RouteId::RecordEdit => Some(Role::Records),
            RouteId::Home | RouteId::Login | RouteId::Unauthorized => None,
        }
    }

    /// The collection a freshly authenticated user lands on.
    pub fn landing_for(role: Role) -> RouteId {
        match role {
            Role::Parts => RouteId::Parts,
            Role::Records => RouteId::Records,
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Navigation may proceed to the requested route.
    Proceed,
    /// Go somewhere else instead.
    Redirect(RouteId),
    /// The session is still unchecked; restore it, then evaluate again.
    AwaitSession,
}

/// Decide whether a navigation to `target` is allowed under `session`.
pub fn evaluate(target: RouteId, session: &SessionState) -> Navigation {
    let user = match session {
        SessionState::Unchecked => return Navigation::AwaitSession,
        SessionState::Anonymous => {
            if target.requires_auth() {
                return Navigation::Redirect(RouteId::Login);
            }
            return Navigation::Proceed;
        }
        SessionState::Authenticated(user) => user,
    };

    // A live session makes the login page pointless; bounce to the landing
    // collection. Other public routes stay reachable.
    if !target.requires_auth() {
        if target == RouteId::Login {
            return Navigation::Redirect(RouteId::landing_for(user.role));
        }
        return Navigation::Proceed;
    }

    if target == RouteId::Home {
        return Navigation::Redirect(RouteId::landing_for(user.role));
    }

    match target.required_role() {
        Some(required) if required != user.role => Navigation::Redirect(RouteId::Unauthorized),
        _ => Navigation::Proceed,
    }
}
