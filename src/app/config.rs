//! Parameter file loading and CLI overrides.

use std::fs;
use std::path::Path;

use crate::domain::{AppError, ParameterInput, Plugin};

/// Values given on the command line; they win over the parameter file.
#[derive(Debug, Clone, Default)]
pub struct ParameterOverrides {
    pub processor_count: Option<i64>,
    pub mongodb_version: Option<String>,
    pub enable: Vec<Plugin>,
    pub show_conf_diff: bool,
}

impl ParameterOverrides {
    pub fn apply_to(&self, input: &mut ParameterInput) {
        if let Some(count) = self.processor_count {
            input.facts.processor_count = Some(count);
        }
        if let Some(version) = &self.mongodb_version {
            input.facts.mongodb_version = Some(version.clone());
        }
        for plugin in &self.enable {
            input.plugins.enable(*plugin);
        }
        if self.show_conf_diff {
            input.show_conf_diff = true;
        }
    }
}

/// Read a parameter file. `.yml`/`.yaml` parse as YAML, anything else as TOML.
pub fn load_parameter_file(path: &Path) -> Result<ParameterInput, AppError> {
    if !path.exists() {
        return Err(AppError::config_error(format!(
            "Parameter file not found: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_parameters(&content, path)
}

fn parse_parameters(content: &str, path: &Path) -> Result<ParameterInput, AppError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

    if is_yaml {
        if content.trim().is_empty() {
            return Ok(ParameterInput::default());
        }
        Ok(serde_yaml::from_str(content)?)
    } else {
        Ok(toml::from_str(content)?)
    }
}

/// Load parameters from an optional file, then apply overrides.
pub fn load_parameters(
    path: Option<&Path>,
    overrides: &ParameterOverrides,
) -> Result<ParameterInput, AppError> {
    let mut input = match path {
        Some(path) => load_parameter_file(path)?,
        None => ParameterInput::default(),
    };
    overrides.apply_to(&mut input);
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TOML_PARAMS: &str = r#"
show_conf_diff = true

[facts]
processor_count = 3
mongodb_version = "2.6.1"

[database]
username = "rspec"
password = "rsp3c4l1f3"

[proxy]
url = "http://fake.com"
port = 7777

[plugins]
rpm = true
"#;

    #[test]
    fn parses_toml_sections() {
        let input = parse_parameters(TOML_PARAMS, Path::new("params.toml")).unwrap();

        assert!(input.show_conf_diff);
        assert_eq!(input.facts.processor_count, Some(3));
        assert_eq!(input.database.username.as_deref(), Some("rspec"));
        assert_eq!(input.proxy.port, Some(7777));
        assert!(input.plugins.rpm);
        assert!(!input.plugins.docker);
    }

    #[test]
    fn parses_yaml_by_extension() {
        let yaml = "facts:\n  processor_count: 12\nplugins:\n  ostree: true\n";
        let input = parse_parameters(yaml, Path::new("params.yaml")).unwrap();

        assert_eq!(input.facts.processor_count, Some(12));
        assert!(input.plugins.ostree);
    }

    #[test]
    fn empty_yaml_is_default_input() {
        let input = parse_parameters("", Path::new("params.yml")).unwrap();
        assert_eq!(input, ParameterInput::default());
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = parse_parameters("[database]\nuser = \"x\"\n", Path::new("p.toml")).unwrap_err();
        assert!(matches!(err, AppError::TomlParseError(_)));
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let temp = tempdir().unwrap();
        let err = load_parameter_file(&temp.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn overrides_win_over_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("params.toml");
        fs::write(&path, TOML_PARAMS).unwrap();
        let overrides = ParameterOverrides {
            processor_count: Some(16),
            mongodb_version: Some("2.4.0".into()),
            enable: vec![Plugin::Docker],
            show_conf_diff: false,
        };

        let input = load_parameters(Some(&path), &overrides).unwrap();

        assert_eq!(input.facts.processor_count, Some(16));
        assert_eq!(input.facts.mongodb_version.as_deref(), Some("2.4.0"));
        assert!(input.plugins.docker && input.plugins.rpm);
        assert!(input.show_conf_diff, "a false flag does not clear the file setting");
    }
}
