use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

// Control plane configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ControlPlaneConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    /// Static privileged key; `None` disables master-key access.
    pub master_key: Option<String>,
    pub jwt: JwtConfig,
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub issuer: String,
    pub leeway_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ControlPlaneConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    master_key: Option<String>,
    jwt_secret: Option<String>,
    jwt_issuer: Option<String>,
    jwt_leeway_secs: Option<u64>,
    seed_path: Option<PathBuf>,
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

impl ControlPlaneConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("MESH_CP_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string())
            .parse()
            .with_context(|| "parse MESH_CP_BIND")?;
        let metrics_bind = std::env::var("MESH_CP_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse MESH_CP_METRICS_BIND")?;
        let leeway_secs = match std::env::var("MESH_JWT_LEEWAY_SECS") {
            Ok(value) => value
                .parse()
                .with_context(|| "parse MESH_JWT_LEEWAY_SECS")?,
            Err(_) => 30,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            master_key: non_empty_env("MESH_MASTER_KEY"),
            jwt: JwtConfig {
                secret: non_empty_env("MESH_JWT_SECRET"),
                issuer: std::env::var("MESH_JWT_ISSUER")
                    .unwrap_or_else(|_| "mesh-controlplane".to_string()),
                leeway_secs,
            },
            seed_path: non_empty_env("MESH_CP_SEED").map(PathBuf::from),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("MESH_CP_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read MESH_CP_CONFIG: {path}"))?;
            let override_cfg: ControlPlaneConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse control plane config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.master_key {
                config.master_key = Some(value).filter(|key| !key.is_empty());
            }
            if let Some(value) = override_cfg.jwt_secret {
                config.jwt.secret = Some(value).filter(|secret| !secret.is_empty());
            }
            if let Some(value) = override_cfg.jwt_issuer {
                config.jwt.issuer = value;
            }
            if let Some(value) = override_cfg.jwt_leeway_secs {
                config.jwt.leeway_secs = value;
            }
            if let Some(value) = override_cfg.seed_path {
                config.seed_path = Some(value);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const KEYS: [&str; 8] = [
        "MESH_CP_BIND",
        "MESH_CP_METRICS_BIND",
        "MESH_MASTER_KEY",
        "MESH_JWT_SECRET",
        "MESH_JWT_ISSUER",
        "MESH_JWT_LEEWAY_SECS",
        "MESH_CP_SEED",
        "MESH_CP_CONFIG",
    ];

    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn clear() -> Self {
            let saved = KEYS
                .iter()
                .map(|key| (*key, std::env::var(key).ok()))
                .collect();
            for key in KEYS {
                unsafe {
                    std::env::remove_var(key);
                }
            }
            Self { saved }
        }

        fn set(&self, key: &'static str, value: &str) {
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, prev) in &self.saved {
                match prev {
                    Some(value) => unsafe {
                        std::env::set_var(key, value);
                    },
                    None => unsafe {
                        std::env::remove_var(key);
                    },
                }
            }
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        let _guard = EnvGuard::clear();
        let config = ControlPlaneConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, "0.0.0.0:8081".parse().expect("addr"));
        assert_eq!(config.metrics_bind, "0.0.0.0:9090".parse().expect("addr"));
        assert!(config.master_key.is_none());
        assert!(config.jwt.secret.is_none());
        assert_eq!(config.jwt.issuer, "mesh-controlplane");
        assert_eq!(config.jwt.leeway_secs, 30);
        assert!(config.seed_path.is_none());
    }

    #[test]
    #[serial]
    fn env_overrides_and_empty_master_key() {
        let guard = EnvGuard::clear();
        guard.set("MESH_CP_BIND", "127.0.0.1:7000");
        guard.set("MESH_MASTER_KEY", "");
        guard.set("MESH_JWT_SECRET", "s3cret");
        guard.set("MESH_JWT_LEEWAY_SECS", "5");
        guard.set("MESH_CP_SEED", "/etc/mesh/seed.yaml");
        let config = ControlPlaneConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 7000);
        assert!(config.master_key.is_none());
        assert_eq!(config.jwt.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.jwt.leeway_secs, 5);
        assert_eq!(
            config.seed_path,
            Some(PathBuf::from("/etc/mesh/seed.yaml"))
        );
    }

    #[test]
    #[serial]
    fn invalid_values_are_rejected() {
        let guard = EnvGuard::clear();
        guard.set("MESH_CP_BIND", "not-an-addr");
        let err = ControlPlaneConfig::from_env().expect_err("bad bind");
        assert!(err.to_string().contains("MESH_CP_BIND"));

        guard.set("MESH_CP_BIND", "127.0.0.1:7000");
        guard.set("MESH_JWT_LEEWAY_SECS", "soon");
        let err = ControlPlaneConfig::from_env().expect_err("bad leeway");
        assert!(err.to_string().contains("MESH_JWT_LEEWAY_SECS"));
    }

    #[test]
    #[serial]
    fn yaml_overrides_env() {
        let guard = EnvGuard::clear();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "bind_addr: 127.0.0.1:7100\nmaster_key: m4ster\njwt_issuer: mesh-test\njwt_leeway_secs: 0"
        )
        .expect("write yaml");
        guard.set("MESH_JWT_ISSUER", "from-env");
        guard.set("MESH_CP_CONFIG", file.path().to_str().expect("utf8 path"));
        let config = ControlPlaneConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr.port(), 7100);
        assert_eq!(config.master_key.as_deref(), Some("m4ster"));
        assert_eq!(config.jwt.issuer, "mesh-test");
        assert_eq!(config.jwt.leeway_secs, 0);
    }

    #[test]
    #[serial]
    fn yaml_with_unknown_fields_fails() {
        let guard = EnvGuard::clear();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "region_id: local").expect("write yaml");
        guard.set("MESH_CP_CONFIG", file.path().to_str().expect("utf8 path"));
        let err = ControlPlaneConfig::from_env_or_yaml().expect_err("unknown field");
        assert!(err.to_string().contains("parse control plane config yaml"));
    }

    #[test]
    #[serial]
    fn missing_yaml_file_is_reported() {
        let guard = EnvGuard::clear();
        guard.set("MESH_CP_CONFIG", "/nonexistent/mesh-cp.yaml");
        let err = ControlPlaneConfig::from_env_or_yaml().expect_err("missing file");
        assert!(err.to_string().contains("read MESH_CP_CONFIG"));
    }
}
