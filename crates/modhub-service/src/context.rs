//! Request context carrying the client identity and moderation rights.

/// Context for the current request, built by the HTTP layer.
///
/// Handlers read the client identity for download counting and resolve the
/// visibility flag through [`RequestContext::include_unapproved`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identity used by the download limiter (usually the client address).
    pub client_identity: String,
    /// Whether the request presented the moderator token.
    pub moderator: bool,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(client_identity: impl Into<String>, moderator: bool) -> Self {
        Self {
            client_identity: client_identity.into(),
            moderator,
        }
    }

    /// Resolve a requested `unapproved` flag. Only moderators may see the
    /// moderation queue; everyone else gets the public view.
    pub fn include_unapproved(&self, requested: bool) -> bool {
        requested && self.moderator
    }
}
