/// Port for the session state owned by the authentication provider
///
/// The catalog never signs users in or out; it only asks who is
/// currently authenticated, at call time, for favorites scoping.
pub trait AuthContext: Send + Sync {
    /// Returns the current user id, None when signed out
    fn current_user_id(&self) -> Option<String>;
}
