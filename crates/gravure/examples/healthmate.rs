//! Example: HealthMate mobile app architecture
//!
//! Builds a mobile architecture diagram with nested clusters and
//! cross-cluster data flows, then renders it with Graphviz.

use gravure::{Diagram, config::DiagramConfig, options::Direction};

const ICON: &str = "./assets/icon/icon.png";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DiagramConfig::new().with_direction(Direction::LeftRight);
    let mut diagram = Diagram::with_config("HealthMate Mobile App Architecture", config);

    // Actors
    let mobile_user = diagram.node("generic.device.mobile", "User");

    // Frontend (Flutter app)
    let (flutter_app, auth_service, health_records_service) =
        diagram.cluster("HealthMate Mobile App (Flutter)", |d| {
            let flutter_app = d.node("programming.framework.flutter", "Main App");

            let (auth_feature, health_records_feature) = d.cluster("Features", |d| {
                Ok((
                    d.custom("Auth Feature\n(Views, Widgets)", ICON),
                    d.custom("Health Records Feature\n(Views, Widgets)", ICON),
                ))
            })?;

            let (auth_service, health_records_service, theme_provider) =
                d.cluster("Application Services", |d| {
                    Ok((
                        d.custom("Auth Service", ICON),
                        d.custom("Health Records Service", ICON),
                        d.custom("Theme Provider", ICON),
                    ))
                })?;

            // Internal connections
            d.connect(
                flutter_app,
                vec![auth_feature, health_records_feature, theme_provider],
            )?;
            d.connect(auth_feature, auth_service)?;
            d.connect(health_records_feature, health_records_service)?;

            Ok((flutter_app, auth_service, health_records_service))
        })?;

    // Backend / data sources
    let (external_auth_provider, health_api, database) =
        diagram.cluster("Backend / Data Sources", |d| {
            Ok((
                d.node(
                    "saas.identity.auth0",
                    "External Auth Provider\n(e.g., Firebase, Auth0, Custom API)",
                ),
                d.custom("Health Records API\n(REST API)", ICON),
                d.node("onprem.database.postgresql", "Database\n(e.g., PostgreSQL, MongoDB)"),
            ))
        })?;

    // Data flow
    diagram.connect(auth_service, external_auth_provider)?;
    diagram.connect(health_records_service, health_api)?;
    diagram.connect(health_api, database)?;

    // User interaction
    diagram.connect(mobile_user, flutter_app)?;

    let artifact = diagram.render()?;
    println!("rendered to {}", artifact.display());

    Ok(())
}
