use anyhow::Result;
use std::path::Path;

use crate::central::CentralClient;
use crate::models::{Assignment, ProfileRef, ProfileSpec, Variables};
use crate::render::render_profile;

/// Outcome of a provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub provisioned: usize,
    pub skipped: usize,
}

/// Render, create, and assign one profile. Strictly forward: a failed
/// render never reaches the network, and a failed creation never
/// reaches assignment.
pub async fn provision_profile(
    client: &CentralClient,
    spec: &ProfileSpec,
    templates_dir: &Path,
    variables: &Variables,
    assignment: &Assignment,
) -> Result<()> {
    let name = variables.profile_name(&spec.var_key).ok_or_else(|| {
        anyhow::anyhow!(
            "variables section '{}' is missing the required 'name' field",
            spec.var_key
        )
    })?;

    let payload = render_profile(templates_dir, &spec.template_file, variables)?;

    tracing::info!("Creating {} profile '{}'...", spec.endpoint, name);
    let result = client
        .create_profile(&spec.endpoint, &spec.bulk_key, &payload)
        .await?;
    tracing::info!("{}", result);

    let profile = ProfileRef::new(&spec.endpoint, name);
    if client.assign_profile_to_scope(&profile, assignment).await? {
        tracing::info!(
            "Successfully assigned profile '{}' to {}",
            profile,
            assignment.scope_name
        );
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "failed to assign profile '{}' to {} '{}'",
            profile,
            assignment.scope_type,
            assignment.scope_name
        ))
    }
}

/// Run the profile descriptors in order, stopping at the first failure.
/// Descriptors whose variables section is absent are skipped, so one
/// variables file can drive a subset of the profile types.
pub async fn provision_all(
    client: &CentralClient,
    specs: &[ProfileSpec],
    templates_dir: &Path,
    variables: &Variables,
    assignment: &Assignment,
) -> Result<ProvisionSummary> {
    let mut provisioned = 0;
    let mut skipped = 0;

    for spec in specs {
        if variables.section(&spec.var_key).is_none() {
            tracing::info!(
                "Skipping {} profile: no '{}' section in variables file",
                spec.endpoint,
                spec.var_key
            );
            skipped += 1;
            continue;
        }

        provision_profile(client, spec, templates_dir, variables, assignment).await?;
        provisioned += 1;
    }

    Ok(ProvisionSummary {
        provisioned,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> CentralClient {
        CentralClient::new(&Credentials {
            base_url: server.uri(),
            access_token: "test-token".to_string(),
        })
        .unwrap()
    }

    fn test_variables() -> Variables {
        serde_yaml::from_str(
            r#"
assignment:
  device_persona: CAMPUS_AP
  scope_type: site_collection
  scope_name: Lab
ntp:
  name: Lab-NTP
  server: time.example.com
ssid:
  name: Lab-WLAN
"#,
        )
        .unwrap()
    }

    fn test_specs() -> Vec<ProfileSpec> {
        vec![
            ProfileSpec::new("ntp", "profile", "ntp.json", "ntp"),
            ProfileSpec::new("wlan-ssids", "wlan-ssid", "wlan-ssid.json", "ssid"),
        ]
    }

    fn write_templates(dir: &TempDir) {
        std::fs::write(
            dir.path().join("ntp.json"),
            r#"{"name": "{{ ntp.name }}", "server": "{{ ntp.server }}"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("wlan-ssid.json"),
            r#"{"ssid": "{{ ssid.name }}"}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_full_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/ntp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/wlan-ssids"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/scope-maps"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_templates(&dir);

        let vars = test_variables();
        let summary = provision_all(
            &test_client(&server),
            &test_specs(),
            dir.path(),
            &vars,
            &vars.assignment,
        )
        .await
        .unwrap();

        assert_eq!(
            summary,
            ProvisionSummary {
                provisioned: 2,
                skipped: 0
            }
        );
    }

    #[tokio::test]
    async fn test_missing_section_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/ntp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/scope-maps"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        // radios has no variables section, so its endpoint is never hit
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/radios"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_templates(&dir);

        let specs = vec![
            ProfileSpec::new("radios", "profile", "radios.json", "radio"),
            ProfileSpec::new("ntp", "profile", "ntp.json", "ntp"),
        ];
        let vars = test_variables();
        let summary = provision_all(
            &test_client(&server),
            &specs,
            dir.path(),
            &vars,
            &vars.assignment,
        )
        .await
        .unwrap();

        assert_eq!(
            summary,
            ProvisionSummary {
                provisioned: 1,
                skipped: 1
            }
        );
    }

    #[tokio::test]
    async fn test_creation_failure_skips_assignment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/ntp"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/scope-maps"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_templates(&dir);

        let vars = test_variables();
        let err = provision_all(
            &test_client(&server),
            &test_specs(),
            dir.path(),
            &vars,
            &vars.assignment,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_assignment_failure_aborts_remaining_profiles() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/ntp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/scope-maps"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;
        // The SSID profile must never be attempted after the NTP
        // assignment fails
        Mock::given(method("POST"))
            .and(path("/network-config/v1alpha1/wlan-ssids"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        write_templates(&dir);

        let vars = test_variables();
        let err = provision_all(
            &test_client(&server),
            &test_specs(),
            dir.path(),
            &vars,
            &vars.assignment,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("ntp/Lab-NTP"));
    }

    #[tokio::test]
    async fn test_missing_template_aborts_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap(); // no templates written

        let vars = test_variables();
        let err = provision_all(
            &test_client(&server),
            &test_specs(),
            dir.path(),
            &vars,
            &vars.assignment,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("ntp.json"));
    }
}
