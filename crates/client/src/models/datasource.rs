//! Shared data source model.
//!
//! A [`DataSourceDefinition`] is materialized from a `.rds` definition file
//! plus optional caller overrides. The definition file itself is treated as
//! an opaque blob with a few extractable fields; only the fields that drive
//! credential-mode selection are parsed, with a typed parser instead of
//! string scraping.
//!
//! # Invariants
//! - Exactly one credential retrieval mode is active, chosen by precedence:
//!   supplied username > specified prompt > integrated (default).

use serde::{Deserialize, Serialize};

use crate::endpoints::parsing::{first_attr, first_text, xsd_bool};
use crate::endpoints::soap::{bool_elem, elem, opt_elem};

/// How the server obtains credentials when the data source is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialRetrieval {
    /// Credentials stored on the server (username/password in the
    /// definition).
    Store,
    /// The user is prompted at run time.
    Prompt,
    /// Integrated (Windows) security.
    Integrated,
}

impl CredentialRetrieval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Prompt => "Prompt",
            Self::Integrated => "Integrated",
        }
    }
}

/// Caller-supplied override for one data source, keyed by name in the
/// upload options. Unset fields fall back to what the `.rds` blob declares.
#[derive(Debug, Clone, Default)]
pub struct DataSourceOverride {
    pub connect_string: Option<String>,
    pub extension: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub prompt: Option<String>,
    pub windows_credentials: bool,
}

impl DataSourceOverride {
    /// Build a full definition from the override alone, for data sources
    /// declared in options without a backing `.rds` file.
    pub fn to_definition(&self) -> DataSourceDefinition {
        DataSourceDefinition::materialize(
            self.connect_string.clone().unwrap_or_default(),
            self.extension.clone(),
            self.user_name.clone(),
            self.password.clone(),
            self.prompt.clone(),
            self.windows_credentials,
            false,
        )
    }
}

/// Definition of a shared data source as sent to `CreateDataSource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceDefinition {
    pub connect_string: String,
    /// Data extension name, e.g. `SQL`.
    pub extension: String,
    pub enabled: bool,
    pub enabled_specified: bool,
    pub impersonate_user_specified: bool,
    pub windows_credentials: bool,
    pub credential_retrieval: CredentialRetrieval,
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub prompt: Option<String>,
}

impl DataSourceDefinition {
    /// Parse a `.rds` blob and apply overrides, returning the resolved
    /// data source name alongside the definition.
    ///
    /// Name resolution order: `Name` attribute in the blob, `<Name>`
    /// element, then the caller-supplied fallback (usually the file name).
    pub fn from_rds(rds: &str, fallback_name: &str, overrides: &DataSourceOverride) -> (String, Self) {
        let name = first_attr(rds, "Name")
            .or_else(|| first_text(rds, "Name"))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());

        let connect_string = overrides
            .connect_string
            .clone()
            .or_else(|| first_text(rds, "ConnectString"))
            .unwrap_or_default();
        let extension = overrides
            .extension
            .clone()
            .or_else(|| first_text(rds, "Extension"));
        let user_name = overrides
            .user_name
            .clone()
            .or_else(|| first_text(rds, "UserName"))
            .filter(|u| !u.is_empty());
        let password = overrides
            .password
            .clone()
            .or_else(|| first_text(rds, "Password"));
        let prompt = overrides
            .prompt
            .clone()
            .or_else(|| first_text(rds, "Prompt"))
            .filter(|p| !p.is_empty());
        let windows_credentials = overrides.windows_credentials
            || first_text(rds, "WindowsCredentials")
                .map(|v| xsd_bool(&v))
                .unwrap_or(false);
        let impersonate = first_text(rds, "ImpersonateUser")
            .map(|v| xsd_bool(&v))
            .unwrap_or(false);

        let definition = Self::materialize(
            connect_string,
            extension,
            user_name,
            password,
            prompt,
            windows_credentials,
            impersonate,
        );
        (name, definition)
    }

    #[allow(clippy::too_many_arguments)]
    fn materialize(
        connect_string: String,
        extension: Option<String>,
        user_name: Option<String>,
        password: Option<String>,
        prompt: Option<String>,
        windows_credentials: bool,
        impersonate_user_specified: bool,
    ) -> Self {
        // Credential precedence: username > prompt > integrated.
        let (credential_retrieval, user_name, password, prompt) = if user_name.is_some() {
            (CredentialRetrieval::Store, user_name, password, None)
        } else if prompt.is_some() {
            (CredentialRetrieval::Prompt, None, None, prompt)
        } else {
            (CredentialRetrieval::Integrated, None, None, None)
        };

        Self {
            connect_string,
            extension: extension.unwrap_or_else(|| "SQL".to_string()),
            enabled: true,
            enabled_specified: true,
            impersonate_user_specified,
            windows_credentials,
            credential_retrieval,
            user_name,
            password,
            prompt,
        }
    }

    /// Inner XML of the `<Definition>` element for `CreateDataSource`.
    pub(crate) fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(&elem("Extension", &self.extension));
        xml.push_str(&elem("ConnectString", &self.connect_string));
        xml.push_str(&elem(
            "CredentialRetrieval",
            self.credential_retrieval.as_str(),
        ));
        xml.push_str(&bool_elem("WindowsCredentials", self.windows_credentials));
        xml.push_str(&bool_elem(
            "ImpersonateUserSpecified",
            self.impersonate_user_specified,
        ));
        xml.push_str(&opt_elem("Prompt", self.prompt.as_deref()));
        xml.push_str(&opt_elem("UserName", self.user_name.as_deref()));
        xml.push_str(&opt_elem("Password", self.password.as_deref()));
        xml.push_str(&bool_elem("Enabled", self.enabled));
        xml.push_str(&bool_elem("EnabledSpecified", self.enabled_specified));
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RDS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
        <RptDataSource Name="AdventureWorks">
          <ConnectionProperties>
            <Extension>SQL</Extension>
            <ConnectString>Data Source=db01;Initial Catalog=AdventureWorks</ConnectString>
            <IntegratedSecurity>true</IntegratedSecurity>
          </ConnectionProperties>
          <DataSourceID>5c7liq0f-8b2a-44c1-aa66-3f36f3b45ea5</DataSourceID>
        </RptDataSource>"#;

    #[test]
    fn test_from_rds_defaults_to_integrated() {
        let (name, def) = DataSourceDefinition::from_rds(RDS, "fallback", &Default::default());
        assert_eq!(name, "AdventureWorks");
        assert_eq!(
            def.connect_string,
            "Data Source=db01;Initial Catalog=AdventureWorks"
        );
        assert_eq!(def.extension, "SQL");
        assert_eq!(def.credential_retrieval, CredentialRetrieval::Integrated);
        assert!(def.enabled && def.enabled_specified);
        assert_eq!(def.user_name, None);
        assert_eq!(def.prompt, None);
    }

    #[test]
    fn test_supplied_username_wins_over_prompt() {
        let rds = "<DataSource><ConnectString>X</ConnectString><Prompt>Enter credentials</Prompt></DataSource>";
        let overrides = DataSourceOverride {
            user_name: Some("sa".to_string()),
            password: Some("pw".to_string()),
            ..Default::default()
        };
        let (_, def) = DataSourceDefinition::from_rds(rds, "ds", &overrides);
        assert_eq!(def.credential_retrieval, CredentialRetrieval::Store);
        assert_eq!(def.user_name.as_deref(), Some("sa"));
        assert_eq!(def.password.as_deref(), Some("pw"));
        assert_eq!(def.prompt, None);
    }

    #[test]
    fn test_prompt_without_username_selects_prompt_mode() {
        let rds = "<DataSource><ConnectString>X</ConnectString><Prompt>Enter credentials</Prompt></DataSource>";
        let (_, def) = DataSourceDefinition::from_rds(rds, "ds", &Default::default());
        assert_eq!(def.credential_retrieval, CredentialRetrieval::Prompt);
        assert_eq!(def.prompt.as_deref(), Some("Enter credentials"));
        assert_eq!(def.user_name, None);
    }

    #[test]
    fn test_name_falls_back_to_file_name() {
        let rds = "<DataSource><ConnectString>X</ConnectString></DataSource>";
        let (name, _) = DataSourceDefinition::from_rds(rds, "warehouse", &Default::default());
        assert_eq!(name, "warehouse");
    }

    #[test]
    fn test_override_connect_string_wins() {
        let overrides = DataSourceOverride {
            connect_string: Some("Data Source=replica".to_string()),
            ..Default::default()
        };
        let (_, def) = DataSourceDefinition::from_rds(RDS, "ds", &overrides);
        assert_eq!(def.connect_string, "Data Source=replica");
    }

    #[test]
    fn test_to_xml_contains_credential_mode() {
        let (_, def) = DataSourceDefinition::from_rds(RDS, "ds", &Default::default());
        let xml = def.to_xml();
        assert!(xml.contains("<CredentialRetrieval>Integrated</CredentialRetrieval>"));
        assert!(xml.contains("<Enabled>true</Enabled>"));
        assert!(!xml.contains("<UserName>"));
    }
}
