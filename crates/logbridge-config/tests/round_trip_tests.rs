use logbridge_config::{AgentConfiguration, ConfigError, PublisherSettings, ServerSettings};

fn sample_configuration() -> AgentConfiguration {
    AgentConfiguration {
        publisher: PublisherSettings {
            product_name: "Unit Test Product Name".to_string(),
            application_name: "Unit Test App Name".to_string(),
            application_version: "3.4.5.6".to_string(),
        },
        server: ServerSettings {
            auto_send_sessions: true,
            repository: "ConfigurationTest".to_string(),
            send_all_applications: true,
            server: "loupe.gibraltarsoftware.com".to_string(),
        },
    }
}

#[test]
fn save_then_load_round_trips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.json");

    let original = sample_configuration();
    original.save(&path).unwrap();

    let loaded = AgentConfiguration::load(&path).unwrap();
    assert_eq!(loaded, original);
    assert_eq!(loaded.publisher.product_name, "Unit Test Product Name");
    assert_eq!(loaded.publisher.application_version, "3.4.5.6");
    assert_eq!(loaded.server.repository, "ConfigurationTest");
    assert_eq!(loaded.server.server, "loupe.gibraltarsoftware.com");
    assert!(loaded.server.auto_send_sessions);
    assert!(loaded.server.send_all_applications);
}

#[test]
fn load_from_missing_path_is_file_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let err = AgentConfiguration::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn load_from_garbage_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = AgentConfiguration::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed(_)));
}

#[test]
fn loads_agent_written_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.json");
    std::fs::write(
        &path,
        r#"{
            "Publisher": {
                "ProductName": "Unit Test Product Name",
                "ApplicationName": "Unit Test App Name",
                "ApplicationVersion": "3.4.5.6"
            },
            "Server": {
                "AutoSendSessions": true,
                "Repository": "ConfigurationTest",
                "SendAllApplications": true,
                "Server": "loupe.gibraltarsoftware.com"
            }
        }"#,
    )
    .unwrap();

    let loaded = AgentConfiguration::load(&path).unwrap();
    assert_eq!(loaded, sample_configuration());
}
