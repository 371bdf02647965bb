use enrol::{Service, ServicesOrquestrator};

fn main() -> std::io::Result<()> {
    ServicesOrquestrator::default()
        .load_environment_variables()
        .set_config_from_env()
        .init_tracing()
        .enable_migrations()
        .add_service(Service::users("USERS_"))
        .run()
}
