pub trait Configuration: Clone + Send + Sync + 'static {
    fn admin_password(&self) -> String;
    fn port(&self) -> String;
    fn database_url(&self) -> Option<String>;
    fn stripe_secret_key(&self) -> String;
    fn stripe_api_base(&self) -> String;
    fn currency(&self) -> String;
}
