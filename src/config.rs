//! Configuration management for the Jenkinsfile linter.
//!
//! Handles:
//! - Command-line argument parsing
//! - INI profile files describing Jenkins servers
//! - `JENKINS_*` environment variables

use clap::Parser;
use ini::{Ini, ParseOption};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Profile used when none is given on the command line
pub const DEFAULT_PROFILE: &str = "default";

/// Default request timeout, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONFIG_FILE_NAME: &str = "jenkinsfilelintrc";

/// Command-line arguments for the linter
#[derive(Debug, Parser)]
#[command(name = "jenkinsfilelint")]
#[command(about = "Jenkins declarative pipeline linter")]
#[command(version)]
pub struct Args {
    /// Alternative configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Jenkins configuration profile to use for linting
    #[arg(short, long, default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Disable SSL certificate checks
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Timeout in seconds for requests to the Jenkins instance
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Print debugging information
    #[arg(short, long)]
    pub debug: bool,

    /// Path to a Jenkinsfile to lint
    #[arg(required = true, value_name = "JENKINSFILE")]
    pub jenkinsfile: Vec<PathBuf>,
}

/// Where to find a Jenkins server and how to log in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ServerSettings {
    /// Settings from `JENKINS_URL`, `JENKINS_USERNAME` and `JENKINS_PASSWORD`.
    ///
    /// `None` unless `JENKINS_URL` is set and non-empty.
    pub fn from_env<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("JENKINS_URL").filter(|url| !url.is_empty())?;
        Some(ServerSettings {
            url,
            username: lookup("JENKINS_USERNAME"),
            password: lookup("JENKINS_PASSWORD"),
        })
    }

    /// Resolve the server from the environment, falling back to the profile file
    pub fn resolve<F>(args: &Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(settings) = Self::from_env(lookup) {
            log::debug!("Loading configuration from environment variables");
            return Ok(settings);
        }

        let profiles = match &args.config {
            Some(path) => Profiles::load(&[path.clone()])?,
            None => Profiles::load(&default_config_paths())?,
        };
        profiles.get(&args.profile)
    }
}

/// Section whose keys every other profile inherits
const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, Default)]
struct Profile {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Profile {
    fn set(&mut self, key: &str, value: &str) {
        let value = Some(value.to_string());
        match key.to_lowercase().as_str() {
            "url" => self.url = value,
            "username" => self.username = value,
            "password" => self.password = value,
            _ => {}
        }
    }

    fn or(&self, fallback: &Profile) -> Profile {
        Profile {
            url: self.url.clone().or_else(|| fallback.url.clone()),
            username: self.username.clone().or_else(|| fallback.username.clone()),
            password: self.password.clone().or_else(|| fallback.password.clone()),
        }
    }
}

/// Profiles loaded from one or more INI configuration files
#[derive(Debug, Clone)]
pub struct Profiles {
    profiles: BTreeMap<String, Profile>,
    defaults: Profile,
    /// Last file read, named in error messages
    path: PathBuf,
}

impl Profiles {
    /// Load every existing file of `paths`, in order.
    ///
    /// Later files override keys of the same profile from earlier ones. Fails
    /// if no file exists.
    pub fn load(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut profiles: BTreeMap<String, Profile> = BTreeMap::new();
        let mut defaults = Profile::default();
        let mut last = None;

        for path in paths {
            let Some(content) = read_optional(path)? else {
                continue;
            };
            log::debug!("Reading configuration file {}", path.display());

            let options = ParseOption {
                enabled_quote: false,
                enabled_escape: false,
                ..ParseOption::default()
            };
            let ini = Ini::load_from_str_opt(&content, options).map_err(|source| {
                ConfigError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;

            for (section, properties) in ini.iter() {
                let profile = match section {
                    Some(DEFAULT_SECTION) => &mut defaults,
                    Some(name) => profiles.entry(name.to_string()).or_default(),
                    None if properties.is_empty() => continue,
                    None => {
                        return Err(ConfigError::MissingSectionHeader { path: path.clone() });
                    }
                };
                for (key, value) in properties.iter() {
                    profile.set(key, value);
                }
            }
            last = Some(path.clone());
        }

        let path = last.ok_or_else(|| ConfigError::NotFound {
            paths: paths.to_vec(),
        })?;
        Ok(Profiles {
            profiles,
            defaults,
            path,
        })
    }

    /// Server settings of `profile`
    pub fn get(&self, profile: &str) -> Result<ServerSettings, ConfigError> {
        let entry = self
            .profiles
            .get(profile)
            .ok_or_else(|| ConfigError::MissingProfile {
                profile: profile.to_string(),
                path: self.path.clone(),
            })?
            .or(&self.defaults);

        let url = entry
            .url
            .clone()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingUrl {
                profile: profile.to_string(),
                path: self.path.clone(),
            })?;

        Ok(ServerSettings {
            url,
            username: entry.username.clone(),
            password: entry.password.clone(),
        })
    }

    /// Last configuration file read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `./.jenkinsfilelintrc`, then `~/.config/jenkinsfilelintrc` on every platform
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(format!(".{}", CONFIG_FILE_NAME))];
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".config").join(CONFIG_FILE_NAME));
    }
    paths
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["jenkinsfilelint"];
        argv.extend_from_slice(extra);
        argv.push("Jenkinsfile");
        Args::parse_from(argv)
    }

    #[test]
    fn test_args_defaults() {
        let args = args(&[]);
        assert_eq!(args.profile, DEFAULT_PROFILE);
        assert_eq!(args.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(!args.insecure);
        assert!(!args.debug);
        assert_eq!(args.config, None);
        assert_eq!(args.jenkinsfile, vec![PathBuf::from("Jenkinsfile")]);
    }

    #[test]
    fn test_args_short_flags() {
        let args = Args::parse_from(["jenkinsfilelint", "-k", "-d", "-t", "5", "-p", "ci", "-c", "rc", "a", "b"]);
        assert!(args.insecure);
        assert!(args.debug);
        assert_eq!(args.timeout, 5);
        assert_eq!(args.profile, "ci");
        assert_eq!(args.config, Some(PathBuf::from("rc")));
        assert_eq!(args.jenkinsfile, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_args_require_a_jenkinsfile() {
        assert!(Args::try_parse_from(["jenkinsfilelint"]).is_err());
    }

    #[test]
    fn test_config_not_exists() {
        let path = PathBuf::from("/no/file/here");
        let err = Profiles::load(&[path]).unwrap_err();
        assert_eq!(err.to_string(), "Unable to load configuration file /no/file/here");
    }

    #[test]
    fn test_config_not_ini() {
        let file = config_file("url = https://example.net\n");
        let err = Profiles::load(&[file.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSectionHeader { .. }));
        assert!(err.to_string().contains("File contains no section headers"));
    }

    #[test]
    fn test_config_unquoted_ini_values() {
        let file = config_file(
            "; Jenkins servers\n[default]\nurl = https://example.net\nusername = jane\npassword: p@ss\\word\n",
        );
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(
            profiles.get(DEFAULT_PROFILE).unwrap(),
            ServerSettings {
                url: "https://example.net".to_string(),
                username: Some("jane".to_string()),
                password: Some("p@ss\\word".to_string()),
            }
        );
    }

    #[test]
    fn test_config_default_section_is_inherited() {
        let file = config_file(
            "[DEFAULT]\nusername = jane\n\n[ci]\nurl = https://ci.example.net\nUSERNAME = ci-bot\n\n[staging]\nurl = https://staging.example.net\n",
        );
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();

        assert_eq!(profiles.get("ci").unwrap().username.as_deref(), Some("ci-bot"));
        assert_eq!(profiles.get("staging").unwrap().username.as_deref(), Some("jane"));
        assert!(matches!(
            profiles.get("DEFAULT"),
            Err(ConfigError::MissingProfile { .. })
        ));
    }

    #[test]
    fn test_default_config_paths() {
        let paths = default_config_paths();
        assert_eq!(paths[0], PathBuf::from(".jenkinsfilelintrc"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(paths[1], home.join(".config").join("jenkinsfilelintrc"));
        }
    }

    #[test]
    fn test_config_valid_default_profile() {
        let file = config_file(
            "[default]\nurl = https://example.net\nusername = username\npassword = password\n",
        );
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(
            profiles.get(DEFAULT_PROFILE).unwrap(),
            ServerSettings {
                url: "https://example.net".to_string(),
                username: Some("username".to_string()),
                password: Some("password".to_string()),
            }
        );
    }

    #[test]
    fn test_config_anonymous_profile() {
        let file = config_file("[ci]\nurl = https://ci.example.net\n");
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();
        let settings = profiles.get("ci").unwrap();
        assert_eq!(settings.username, None);
        assert_eq!(settings.password, None);
    }

    #[test]
    fn test_config_missing_profile() {
        let file = config_file("[default]\nurl = https://example.net\n");
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();
        let err = profiles.get("other").unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Missing profile `other` in configuration file {}",
                file.path().display()
            )
        );
    }

    #[test]
    fn test_config_missing_url() {
        let file = config_file("[default]\nusername = username\n");
        let profiles = Profiles::load(&[file.path().to_path_buf()]).unwrap();
        let err = profiles.get(DEFAULT_PROFILE).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Missing `url` key for profile `default` in configuration file {}",
                file.path().display()
            )
        );
    }

    #[test]
    fn test_config_later_file_overrides() {
        let first = config_file("[default]\nurl = https://one\nusername = jane\n");
        let second = config_file("[default]\nurl = https://two\n");
        let profiles = Profiles::load(&[
            first.path().to_path_buf(),
            PathBuf::from("/no/file/here"),
            second.path().to_path_buf(),
        ])
        .unwrap();

        let settings = profiles.get(DEFAULT_PROFILE).unwrap();
        assert_eq!(settings.url, "https://two");
        assert_eq!(settings.username.as_deref(), Some("jane"));
        assert_eq!(profiles.path(), second.path());
    }

    #[test]
    fn test_env_takes_precedence() {
        let env: HashMap<&str, &str> = [
            ("JENKINS_URL", "url2"),
            ("JENKINS_USERNAME", "username2"),
            ("JENKINS_PASSWORD", "password2"),
        ]
        .into_iter()
        .collect();

        let args = args(&["--config", "/no/file/here"]);
        let settings =
            ServerSettings::resolve(&args, |key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(
            settings,
            ServerSettings {
                url: "url2".to_string(),
                username: Some("username2".to_string()),
                password: Some("password2".to_string()),
            }
        );
    }

    #[test]
    fn test_empty_env_url_falls_back_to_profile() {
        let file = config_file("[default]\nurl = https://example.net\n");
        let config = file.path().to_str().unwrap();
        let args = args(&["--config", config]);

        let settings = ServerSettings::resolve(&args, |key| {
            (key == "JENKINS_URL").then(String::new)
        })
        .unwrap();
        assert_eq!(settings.url, "https://example.net");
    }
}
