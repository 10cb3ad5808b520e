use httplet::config::Config;
use std::collections::HashMap;
use std::io::Write;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::from_lookup(lookup(&[])).unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.recv_buffer_size, 2048);
    assert_eq!(cfg.max_head_size, 8192);
    assert_eq!(cfg.server_name, "httplet");
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_listen_from_env() {
    let cfg = Config::from_lookup(lookup(&[("LISTEN", "127.0.0.1:8000")])).unwrap();

    assert!(cfg.listen_addr.contains("127.0.0.1"));
    assert!(cfg.listen_addr.contains("8000"));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str(
        "listen_addr: \"0.0.0.0:3000\"\nrecv_buffer_size: 512\nserver_name: demo\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.recv_buffer_size, 512);
    assert_eq!(cfg.max_head_size, 8192);
    assert_eq!(cfg.server_name, "demo");
}

#[test]
fn test_config_rejects_unknown_fields() {
    assert!(Config::from_yaml_str("listen: \"0.0.0.0:3000\"\n").is_err());
}

#[test]
fn test_config_rejects_zero_buffer() {
    assert!(Config::from_yaml_str("recv_buffer_size: 0\n").is_err());
    assert!(Config::from_yaml_str("max_head_size: 0\n").is_err());
}

#[test]
fn test_config_file_with_env_override() {
    let path = std::env::temp_dir().join(format!("httplet-config-{}.yaml", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "listen_addr: \"127.0.0.1:7000\"").unwrap();
        writeln!(file, "max_head_size: 1024").unwrap();
    }
    let path_str = path.to_string_lossy().into_owned();

    let from_file = Config::from_lookup(lookup(&[("HTTPLET_CONFIG", path_str.as_str())])).unwrap();
    assert_eq!(from_file.listen_addr, "127.0.0.1:7000");
    assert_eq!(from_file.max_head_size, 1024);

    let overridden = Config::from_lookup(lookup(&[
        ("HTTPLET_CONFIG", path_str.as_str()),
        ("LISTEN", "0.0.0.0:5001"),
    ]))
    .unwrap();
    assert_eq!(overridden.listen_addr, "0.0.0.0:5001");
    assert_eq!(overridden.max_head_size, 1024);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_config_missing_file_is_error() {
    let result = Config::from_lookup(lookup(&[("HTTPLET_CONFIG", "/nonexistent/httplet.yaml")]));

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/httplet.yaml"));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.listen_addr, cfg2.listen_addr);
}
