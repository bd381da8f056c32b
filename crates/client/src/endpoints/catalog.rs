//! Catalog-management operations (ReportService2010 contract).
//!
//! Free functions, one per remote operation; each builds the operation
//! body, invokes the transport shim and parses the response envelope. The
//! client layer owns path qualification and caching.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::auth::AuthStrategy;
use crate::endpoints::parsing::{all_texts, element_blocks, first_text, xsd_bool};
use crate::endpoints::soap::{self, NS_SERVICE, SoapCall, bool_elem, elem, opt_elem};
use crate::error::{ClientError, Result};
use crate::models::{
    CatalogItem, ConnectionTest, DataSourceDefinition, ItemInfo, ItemReference, ItemReferenceData,
    ItemType, Job, Property, ReportParameter, ValidValue,
};

async fn invoke(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    operation: &'static str,
    body: String,
) -> Result<String> {
    soap::call(
        http,
        url,
        auth,
        SoapCall {
            namespace: NS_SERVICE,
            operation,
            body,
            header: None,
        },
    )
    .await
}

/// List the items directly under a folder (or the whole subtree with
/// `recursive`).
pub async fn list_children(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    folder: &str,
    recursive: bool,
) -> Result<Vec<CatalogItem>> {
    let body = elem("ItemPath", folder) + &bool_elem("Recursive", recursive);
    let response = invoke(http, url, auth, "ListChildren", body).await?;

    let items = element_blocks(&response, "CatalogItem")
        .iter()
        .filter_map(|block| {
            let name = first_text(block, "Name")?;
            let path = first_text(block, "Path")?;
            let item_type = first_text(block, "TypeName")
                .map(|t| ItemType::from_type_name(&t))
                .unwrap_or(ItemType::Other(String::new()));
            let hidden = first_text(block, "Hidden")
                .map(|h| xsd_bool(&h))
                .unwrap_or(false);
            Some(CatalogItem {
                name,
                path,
                item_type,
                hidden,
            })
        })
        .collect();
    Ok(items)
}

/// Read the requested properties of an item. An empty `names` slice asks
/// the server for every property.
pub async fn get_properties(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    names: &[&str],
) -> Result<Vec<Property>> {
    let mut body = elem("ItemPath", path);
    if !names.is_empty() {
        body.push_str("<Properties>");
        for name in names {
            body.push_str(&format!("<Property>{}</Property>", elem("Name", name)));
        }
        body.push_str("</Properties>");
    }
    let response = invoke(http, url, auth, "GetProperties", body).await?;
    Ok(parse_properties(&response))
}

pub async fn set_properties(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    properties: &[Property],
) -> Result<()> {
    let mut body = elem("ItemPath", path);
    body.push_str("<Properties>");
    for property in properties {
        body.push_str(&format!(
            "<Property>{}{}</Property>",
            elem("Name", &property.name),
            elem("Value", &property.value)
        ));
    }
    body.push_str("</Properties>");
    invoke(http, url, auth, "SetProperties", body).await?;
    Ok(())
}

/// Fetch an item's definition blob, base64-decoded, with NUL padding
/// stripped.
pub async fn get_item_definition(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
) -> Result<String> {
    let body = elem("ItemPath", path);
    let response = invoke(http, url, auth, "GetItemDefinition", body).await?;
    let encoded = first_text(&response, "Definition").ok_or_else(|| {
        ClientError::InvalidResponse("GetItemDefinition response missing Definition".to_string())
    })?;
    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|e| ClientError::InvalidResponse(format!("definition is not valid base64: {e}")))?;
    let text = String::from_utf8_lossy(&decoded).replace('\u{0}', "");
    Ok(text)
}

pub async fn delete_item(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
) -> Result<()> {
    invoke(http, url, auth, "DeleteItem", elem("ItemPath", path)).await?;
    Ok(())
}

pub async fn create_folder(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    name: &str,
    parent: &str,
) -> Result<ItemInfo> {
    let body = elem("Folder", name) + &elem("Parent", parent);
    let response = invoke(http, url, auth, "CreateFolder", body).await?;
    Ok(parse_item_info(&response, name, parent))
}

/// Create (or overwrite) a shared data source.
pub async fn create_data_source(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    name: &str,
    parent: &str,
    overwrite: bool,
    definition: &DataSourceDefinition,
    hidden: bool,
) -> Result<ItemInfo> {
    let mut body = elem("DataSource", name)
        + &elem("Parent", parent)
        + &bool_elem("Overwrite", overwrite)
        + &format!("<Definition>{}</Definition>", definition.to_xml());
    if hidden {
        body.push_str(&hidden_property());
    }
    let response = invoke(http, url, auth, "CreateDataSource", body).await?;
    Ok(parse_item_info(&response, name, parent))
}

/// Create (or overwrite) a report from its RDL definition.
pub async fn create_report(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    name: &str,
    parent: &str,
    overwrite: bool,
    definition: &[u8],
    hidden: bool,
) -> Result<ItemInfo> {
    let properties = if hidden {
        vec![Property::new("Hidden", "true")]
    } else {
        Vec::new()
    };
    create_catalog_item(
        http, url, auth, "Report", name, parent, overwrite, definition, &properties,
    )
    .await
}

/// Upload an arbitrary file as a catalog resource.
pub async fn create_resource(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    name: &str,
    parent: &str,
    overwrite: bool,
    content: &[u8],
    mime_type: Option<&str>,
) -> Result<ItemInfo> {
    let properties: Vec<Property> = mime_type
        .map(|mime| vec![Property::new("MimeType", mime)])
        .unwrap_or_default();
    create_catalog_item(
        http, url, auth, "Resource", name, parent, overwrite, content, &properties,
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn create_catalog_item(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    item_type: &str,
    name: &str,
    parent: &str,
    overwrite: bool,
    definition: &[u8],
    properties: &[Property],
) -> Result<ItemInfo> {
    let mut body = elem("ItemType", item_type)
        + &elem("Name", name)
        + &elem("Parent", parent)
        + &bool_elem("Overwrite", overwrite)
        + &elem("Definition", &BASE64.encode(definition));
    if !properties.is_empty() {
        body.push_str("<Properties>");
        for property in properties {
            body.push_str(&format!(
                "<Property>{}{}</Property>",
                elem("Name", &property.name),
                elem("Value", &property.value)
            ));
        }
        body.push_str("</Properties>");
    }
    let response = invoke(http, url, auth, "CreateCatalogItem", body).await?;
    Ok(parse_item_info(&response, name, parent))
}

/// Read the references an item holds to other items of one type
/// (`DataSource`, `DataSet`, ...). A dangling binding comes back with no
/// `Reference` value.
pub async fn get_item_references(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    reference_item_type: &str,
) -> Result<Vec<ItemReferenceData>> {
    let body = elem("ItemPath", path) + &elem("ReferenceItemType", reference_item_type);
    let response = invoke(http, url, auth, "GetItemReferences", body).await?;

    let references = element_blocks(&response, "ItemReferenceData")
        .iter()
        .filter_map(|block| {
            Some(ItemReferenceData {
                name: first_text(block, "Name")?,
                reference: first_text(block, "Reference").filter(|r| !r.is_empty()),
            })
        })
        .collect();
    Ok(references)
}

pub async fn set_item_references(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    references: &[ItemReference],
) -> Result<()> {
    let mut body = elem("ItemPath", path);
    body.push_str("<ItemReferences>");
    for reference in references {
        body.push_str(&format!(
            "<ItemReference>{}{}</ItemReference>",
            elem("Name", &reference.name),
            elem("Reference", &reference.reference)
        ));
    }
    body.push_str("</ItemReferences>");
    invoke(http, url, auth, "SetItemReferences", body).await?;
    Ok(())
}

/// Read a report's data source bindings (2005-contract shape, where each
/// binding is a `DataSource` with a reference or an invalid-reference
/// marker).
pub async fn get_item_data_sources(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
) -> Result<Vec<ItemReferenceData>> {
    let body = elem("ItemPath", path);
    let response = invoke(http, url, auth, "GetItemDataSources", body).await?;

    let sources = element_blocks(&response, "DataSource")
        .iter()
        .filter_map(|block| {
            Some(ItemReferenceData {
                name: first_text(block, "Name")?,
                reference: first_text(block, "DataSourceReference").filter(|r| !r.is_empty()),
            })
        })
        .collect();
    Ok(sources)
}

pub async fn set_item_data_sources(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    references: &[ItemReference],
) -> Result<()> {
    let mut body = elem("ItemPath", path);
    body.push_str("<DataSources>");
    for reference in references {
        body.push_str(&format!(
            "<ItemDataSource>{}{}</ItemDataSource>",
            elem("Name", &reference.name),
            elem("DataSourceReference", &reference.reference)
        ));
    }
    body.push_str("</DataSources>");
    invoke(http, url, auth, "SetItemDataSources", body).await?;
    Ok(())
}

/// Read a report's declared parameters with their metadata.
pub async fn get_item_parameters(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    path: &str,
    for_rendering: bool,
) -> Result<Vec<ReportParameter>> {
    let body = elem("ItemPath", path) + &bool_elem("ForRendering", for_rendering);
    let response = invoke(http, url, auth, "GetItemParameters", body).await?;

    let parameters = element_blocks(&response, "ItemParameter")
        .iter()
        .filter_map(|block| {
            let valid_values = element_blocks(block, "ValidValue")
                .iter()
                .filter_map(|vv| {
                    Some(ValidValue {
                        label: first_text(vv, "Label"),
                        value: first_text(vv, "Value")?,
                    })
                })
                .collect();
            let default_values = element_blocks(block, "DefaultValues")
                .first()
                .map(|dv| all_texts(dv, "Value"))
                .unwrap_or_default();
            Some(ReportParameter {
                name: first_text(block, "Name")?,
                parameter_type: first_text(block, "ParameterTypeName"),
                nullable: first_text(block, "Nullable").map(|v| xsd_bool(&v)).unwrap_or(false),
                allow_blank: first_text(block, "AllowBlank").map(|v| xsd_bool(&v)).unwrap_or(false),
                multi_value: first_text(block, "MultiValue").map(|v| xsd_bool(&v)).unwrap_or(false),
                prompt: first_text(block, "Prompt").filter(|p| !p.is_empty()),
                valid_values,
                default_values,
                value: None,
            })
        })
        .collect();
    Ok(parameters)
}

pub async fn list_jobs(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
) -> Result<Vec<Job>> {
    let response = invoke(http, url, auth, "ListJobs", String::new()).await?;

    let jobs = element_blocks(&response, "Job")
        .iter()
        .filter_map(|block| {
            Some(Job {
                job_id: first_text(block, "JobID")?,
                name: first_text(block, "Name").unwrap_or_default(),
                path: first_text(block, "Path").unwrap_or_default(),
                machine: first_text(block, "Machine"),
                user: first_text(block, "User"),
                start_date_time: first_text(block, "StartDateTime"),
                status: first_text(block, "Status"),
            })
        })
        .collect();
    Ok(jobs)
}

/// Ask the server to cancel a job. Returns whether the job was still
/// running and got cancelled.
pub async fn cancel_job(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    job_id: &str,
) -> Result<bool> {
    let response = invoke(http, url, auth, "CancelJob", elem("JobID", job_id)).await?;
    Ok(first_text(&response, "CancelJobResult")
        .map(|v| xsd_bool(&v))
        .unwrap_or(false))
}

/// Test connectivity for a data source definition without creating it.
pub async fn test_data_source_connection(
    http: &reqwest::Client,
    url: &str,
    auth: &AuthStrategy,
    definition: &DataSourceDefinition,
    user_name: Option<&str>,
    password: Option<&str>,
) -> Result<ConnectionTest> {
    let body = format!("<DataSourceDefinition>{}</DataSourceDefinition>", definition.to_xml())
        + &opt_elem("UserName", user_name)
        + &opt_elem("Password", password);
    let response =
        invoke(http, url, auth, "TestConnectForDataSourceDefinition", body).await?;

    let successful = first_text(&response, "TestConnectForDataSourceDefinitionResult")
        .map(|v| xsd_bool(&v))
        .unwrap_or(false);
    let error = first_text(&response, "ConnectError").filter(|e| !e.is_empty());
    Ok(ConnectionTest { successful, error })
}

fn parse_properties(response: &str) -> Vec<Property> {
    element_blocks(response, "Property")
        .iter()
        .filter_map(|block| {
            Some(Property {
                name: first_text(block, "Name")?,
                value: first_text(block, "Value").unwrap_or_default(),
            })
        })
        .collect()
}

// The create operations echo the item back; fall back to the request
// arguments when the echo is absent.
fn parse_item_info(response: &str, name: &str, parent: &str) -> ItemInfo {
    let block = element_blocks(response, "ItemInfo").into_iter().next();
    let fallback_path = if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    };
    match block {
        Some(block) => ItemInfo {
            name: first_text(&block, "Name").unwrap_or_else(|| name.to_string()),
            path: first_text(&block, "Path").unwrap_or(fallback_path),
        },
        None => ItemInfo {
            name: name.to_string(),
            path: fallback_path,
        },
    }
}

fn hidden_property() -> String {
    "<Properties><Property><Name>Hidden</Name><Value>true</Value></Property></Properties>"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let response = r#"<GetPropertiesResponse><Values>
            <Property><Name>Hidden</Name><Value>False</Value></Property>
            <Property><Name>Description</Name><Value>Quarterly</Value></Property>
        </Values></GetPropertiesResponse>"#;
        let properties = parse_properties(response);
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0], Property::new("Hidden", "False"));
    }

    #[test]
    fn test_parse_item_info_prefers_echo() {
        let response = "<r><ItemInfo><Name>Revenue</Name><Path>/Reports/Revenue</Path></ItemInfo></r>";
        let info = parse_item_info(response, "Other", "/Elsewhere");
        assert_eq!(info.name, "Revenue");
        assert_eq!(info.path, "/Reports/Revenue");
    }

    #[test]
    fn test_parse_item_info_falls_back_to_arguments() {
        let info = parse_item_info("<r/>", "Revenue", "/Reports");
        assert_eq!(info.path, "/Reports/Revenue");
        let info = parse_item_info("<r/>", "Revenue", "/");
        assert_eq!(info.path, "/Revenue");
    }
}
