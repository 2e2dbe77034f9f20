mod config_test;
mod customer_test;
mod health_test;
mod middleware_test;
mod roster_test;
mod sessions_test;
mod wizard_test;
