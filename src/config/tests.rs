use super::*;

#[test]
fn defaults_match_the_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.store.url, DEFAULT_STORE_URL);
    assert_eq!(settings.cache.ttl, Duration::from_secs(60));
    assert_eq!(settings.locking.lease, Duration::from_secs(60));
    assert_eq!(settings.locking.default_delay, Duration::from_millis(500));
    assert_eq!(settings.rate_limit.max_requests.get(), 120);
    assert_eq!(settings.rate_limit.window(), Duration::from_secs(60));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.store.url = Some("redis://cache:6379".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        store_url: Some("memory://".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.store.url, "memory://");
}

#[test]
fn later_sources_override_earlier_ones() {
    let raw: RawSettings = Config::builder()
        .set_default("locking.lease_seconds", 30)
        .expect("default")
        .set_override("locking.lease_seconds", 5)
        .expect("override")
        .build()
        .expect("config")
        .try_deserialize()
        .expect("raw settings");

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.locking.lease, Duration::from_secs(5));
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_lease_is_rejected() {
    let mut raw = RawSettings::default();
    raw.locking.lease_seconds = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero lease");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "locking.lease_seconds",
            ..
        }
    ));
}

#[test]
fn zero_delay_is_allowed() {
    let mut raw = RawSettings::default();
    raw.locking.default_delay_ms = Some(0);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.locking.default_delay, Duration::ZERO);
}

#[test]
fn unknown_store_scheme_is_rejected() {
    let mut raw = RawSettings::default();
    raw.store.url = Some("memcached://localhost".to_string());

    let err = Settings::from_raw(raw).expect_err("bad scheme");
    assert!(matches!(err, LoadError::Invalid { key: "store.url", .. }));
}

#[test]
fn rate_limit_ceiling_must_be_positive() {
    let mut raw = RawSettings::default();
    raw.rate_limit.max_requests = Some(0);

    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["catalog"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from([
        "catalog",
        "migrate",
        "--database-url",
        "postgres://example",
    ]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "catalog",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--lock-default-delay-ms",
        "2000",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.lock_default_delay_ms, Some(2000));
        }
        _ => panic!("wrong command parsed"),
    }
}
