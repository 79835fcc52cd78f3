use ferrous_ptr_domain::config::{Config, RuleSpec};
use ferrous_ptr_domain::{BackendKind, DnsProtocol, PrecedenceMode};
use std::net::IpAddr;

const FULL_CONFIG: &str = r#"
[server]
dns_port = 5353
bind_address = "0.0.0.0"

[upstream]
server = "tls://dns.quad9.net@9.9.9.9:853"
timeout_ms = 2000

[logging]
level = "debug"
json = true

[synthesis]
static_ttl = 600
dynamic_ttl = 15

[backends.persistent_store]
path = "/var/lib/ferrous-ptr/addresses.db"

[backends.dynamic_discovery]
address = "127.0.0.1:6379"
key_prefix = "dns;"
max_hops = 4

[[policy]]
backends = ["dynamic_discovery", "persistent_store"]
rules = [
    { net = "10.0.0.0/24", mode = "last", fqdn = "office.example.com" },
    "10.0.0.0/25 last office-norouting",
]

[[policy]]
rules = ["0.0.0.0/0 first"]
"#;

#[test]
fn test_default_config_is_valid() {
    let config = Config::default();

    assert_eq!(config.server.dns_port, 53);
    assert_eq!(config.server.bind_address, "127.0.0.1");
    assert_eq!(config.synthesis.static_ttl, 60);
    assert_eq!(config.synthesis.dynamic_ttl, 30);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
    assert!(config.policy.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_full_config_parses() {
    let config = Config::from_toml(FULL_CONFIG).unwrap();

    assert_eq!(config.server.dns_port, 5353);
    assert_eq!(config.upstream.timeout_ms, 2000);
    assert!(config.logging.json);
    assert_eq!(config.synthesis.static_ttl, 600);
    assert_eq!(
        config.backends.dynamic_discovery.as_ref().unwrap().max_hops,
        4
    );
    assert_eq!(config.policy.len(), 2);
    assert!(matches!(config.policy[0].rules[0], RuleSpec::Table { .. }));
    assert!(matches!(config.policy[0].rules[1], RuleSpec::Line(_)));
    assert!(config.validate().is_ok());
}

#[test]
fn test_policy_table_from_full_config() {
    let config = Config::from_toml(FULL_CONFIG).unwrap();
    let table = config.policy_table().unwrap();

    assert_eq!(table.groups().len(), 2);
    assert_eq!(table.rule_count(), 3);
    assert_eq!(
        table.groups()[0].backends,
        vec![BackendKind::DynamicDiscovery, BackendKind::PersistentStore]
    );

    let ip: IpAddr = "10.0.0.23".parse().unwrap();
    let matched = table.find(ip).unwrap();
    assert_eq!(matched.rule.prefix(), 25);
    assert_eq!(matched.rule.mode, PrecedenceMode::DefaultLast);
    assert_eq!(matched.rule.default_name.as_deref(), Some("office-norouting."));
}

#[test]
fn test_legacy_backend_and_mode_names_are_accepted() {
    let toml_str = r#"
        [backends.sqlite]
        db = "/tmp/addresses.db"

        [backends.shodohflo]
        redis_server = "10.1.1.1:6379"

        [[policy]]
        backends = ["shodohflo", "sqlite"]
        rules = [{ net = "192.168.0.0/16", mode = "default_first", fqdn = "lan" }]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.backends.persistent_store.is_some());
    assert!(config.backends.dynamic_discovery.is_some());
    assert!(config.validate().is_ok());

    let table = config.policy_table().unwrap();
    assert_eq!(table.groups()[0].rules[0].mode, PrecedenceMode::DefaultFirst);
}

#[test]
fn test_hardcoded_backend_in_config() {
    let toml_str = r#"
        [[policy]]
        backends = [{ hardcoded = "gateway.example.com" }]
        rules = ["10.1.0.1 last"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    let table = config.policy_table().unwrap();
    assert_eq!(
        table.groups()[0].backends,
        vec![BackendKind::Hardcoded("gateway.example.com".into())]
    );
    assert_eq!(table.groups()[0].rules[0].prefix(), 32);
}

#[test]
fn test_validate_rejects_missing_backend_section() {
    let toml_str = r#"
        [[policy]]
        backends = ["persistent_store"]
        rules = ["10.0.0.0/8 last"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("persistent_store"));
}

#[test]
fn test_validate_rejects_bad_rule() {
    let toml_str = r#"
        [[policy]]
        rules = ["10.0.0.1/24 last"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.policy_table().is_err());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_malformed_default_name() {
    let toml_str = r#"
        [[policy]]
        rules = [{ net = "10.0.0.0/24", mode = "first", fqdn = "bad..name" }]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("bad..name"));
}

#[test]
fn test_validate_rejects_empty_hardcoded_backend() {
    let toml_str = r#"
        [[policy]]
        backends = [{ hardcoded = "" }, "dynamic_discovery"]
        rules = ["10.0.0.0/24 last"]

        [backends.dynamic_discovery]
        address = "127.0.0.1:6379"
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.policy_table().is_err());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("hardcoded backend in policy group 1"));
}

#[test]
fn test_validate_rejects_hardcoded_name_with_spaces() {
    let toml_str = r#"
        [[policy]]
        backends = [{ hardcoded = "gate way.example" }]
        rules = ["10.0.0.1 last"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unknown_mode() {
    let toml_str = r#"
        [[policy]]
        rules = ["10.0.0.0/24 sometimes"]
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_ttl_and_port() {
    let mut config = Config::default();
    config.synthesis.dynamic_ttl = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.server.dns_port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_max_hops() {
    let toml_str = r#"
        [backends.dynamic_discovery]
        address = "127.0.0.1:6379"
        max_hops = 0
    "#;

    let config = Config::from_toml(toml_str).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_upstream_protocol() {
    let mut config = Config::default();
    assert!(matches!(
        config.upstream_protocol().unwrap(),
        DnsProtocol::Tls { .. }
    ));

    config.upstream.server = "tcp://192.0.2.53:53".to_string();
    assert!(matches!(
        config.upstream_protocol().unwrap(),
        DnsProtocol::Tcp { .. }
    ));

    config.upstream.server = "dns.quad9.net:53".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_unparseable_toml_is_a_parse_error() {
    let result = Config::from_toml("[[policy]\nrules = ");
    assert!(result.is_err());
}
