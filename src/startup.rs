use crate::catchers::*;
use crate::configuration::{AdminSeedSettings, DatabaseSettings, Settings};
use crate::domain::NewAdmin;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use anyhow::{anyhow, Context};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::AdHoc;
use rocket::figment::util::map;
use rocket::figment::value::Value;
use rocket::{Build, Config, Ignite, Rocket};
use rocket_sync_db_pools::database;
use secrecy::ExposeSecret;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("waitlist")]
pub struct WaitlistDbConn(diesel::PgConnection);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Application, anyhow::Error> {
        let token_issuer = configuration
            .authentication
            .token_issuer()
            .context("Failed to build the token issuer.")?;
        let admin_seed = configuration.admin.clone();
        let (port_saver, port) = port_saver::create_pair();

        let figment = Config::figment()
            .merge(("address", configuration.application.host))
            .merge(("port", configuration.application.port.unwrap_or(0)))
            .merge(("databases", map!["waitlist" => database_config(&configuration.database)]));

        let server = rocket::custom(figment)
            .attach(WaitlistDbConn::fairing())
            .attach(AdHoc::try_on_ignite("Migrations and default admin", move |rocket| {
                prepare_database(rocket, admin_seed)
            }))
            .attach(port_saver)
            .manage(token_issuer)
            .mount(
                "/",
                routes![
                    health_check,
                    register_user,
                    register_creator,
                    record_not_interested,
                    start_feedback,
                    submit_ui_feedback,
                    submit_ux_feedback,
                    submit_suggestions,
                    get_feedback,
                    admin_login,
                    refresh,
                    logout,
                    me,
                    validate_token,
                    create_admin_user,
                    registered_users,
                    registered_creators,
                    not_interested_records,
                    feedback_records,
                    download_data,
                ],
            )
            .register(
                "/",
                catchers![
                    bad_request,
                    unprocessable_entity_to_bad_request,
                    unauthorized_request_credentials,
                    forbidden,
                    not_found,
                    internal_error,
                ],
            )
            .ignite()
            .await?;

        Ok(Application { server, port })
    }
}

fn database_config(settings: &DatabaseSettings) -> rocket::figment::value::Map<&'static str, Value> {
    map![
        "url" => Value::from(settings.connection_string().expose_secret().clone()),
        "pool_size" => Value::from(settings.pool_size),
    ]
}

async fn prepare_database(
    rocket: Rocket<Build>,
    admin_seed: Option<AdminSeedSettings>,
) -> Result<Rocket<Build>, Rocket<Build>> {
    let conn = match WaitlistDbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("No database connection available to run migrations");
            return Err(rocket);
        }
    };

    let result = conn
        .run(move |c| -> Result<(), anyhow::Error> {
            c.run_pending_migrations(MIGRATIONS)
                .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
            if let Some(seed) = admin_seed {
                seed_default_admin(c, seed)?;
            }
            Ok(())
        })
        .await;

    match result {
        Ok(()) => Ok(rocket),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Failed to prepare the database");
            Err(rocket)
        }
    }
}

#[tracing::instrument(name = "Seed the default admin", skip(conn, seed), fields(username = %seed.username))]
fn seed_default_admin(
    conn: &mut diesel::PgConnection,
    seed: AdminSeedSettings,
) -> Result<(), anyhow::Error> {
    if admin_username_exists(conn, &seed.username)? {
        return Ok(());
    }
    let new_admin = NewAdmin::parse(seed.username, seed.email, seed.password)
        .map_err(|e| anyhow!("Invalid default admin settings: {}", e))?;
    insert_admin(conn, &new_admin, true).context("Failed to insert the default admin.")?;
    tracing::info!("Created the default superuser");
    Ok(())
}
