/// Tests for pgmt apply command functionality
/// These tests verify the actual apply command interface and behavior
use anyhow::Result;
use pgmt::commands::apply::{ExecutionMode, cmd_apply};
use pgmt::config::{
    ConfigBuilder, ConfigInput, DatabasesInput, DirectoriesInput, ShadowDatabaseInput,
};
use std::fs;
use tempfile::TempDir;

/// Test ExecutionMode enum variants and their properties
#[test]
fn test_execution_mode_variants() {
    // Verify ExecutionMode enum variants exist and can be cloned
    let modes = vec![
        ExecutionMode::DryRun,
        ExecutionMode::Force,
        ExecutionMode::SafeOnly,
        ExecutionMode::RequireApproval,
        ExecutionMode::Interactive,
    ];

    // Test cloning capability
    for mode in modes {
        let _cloned = mode.clone();
        // ExecutionMode exists and is cloneable
    }
}

/// Test that apply command function has correct signature and can be referenced
#[test]
fn test_apply_command_signature() {
    // This test verifies the command function exists with expected signature
    // We can't easily execute it without complex setup, but we can verify it compiles

    async fn test_fn() -> Result<()> {
        use std::path::Path;

        // Create minimal config for signature test
        let config_input = ConfigInput {
            databases: Some(DatabasesInput {
                dev_url: Some("postgres://test".to_string()),
                shadow_url: None,
                target_url: None,
                shadow: Some(ShadowDatabaseInput {
                    auto: Some(true),
                    url: None,
                    docker: None,
                }),
            }),
            directories: Some(DirectoriesInput {
                schema_dir: Some("schema".to_string()),
                migrations_dir: None,
                baselines_dir: None,
                roles_file: None,
            }),
            objects: None,
            migration: None,
            schema: None,
            docker: None,
        };

        let config = ConfigBuilder::new().with_file(config_input).resolve()?;

        let root_dir = Path::new("/tmp");

        // This won't succeed due to invalid config, but proves the signature is correct
        let _result = cmd_apply(&config, root_dir, ExecutionMode::DryRun).await;

        Ok(())
    }

    // We don't actually call the async function, just verify it compiles
    let _ = test_fn;
}

/// Test that apply command interface exists and has expected error handling
#[tokio::test]
async fn test_apply_command_error_handling() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root_dir = temp_dir.path();

    // Create empty schema directory
    let schema_dir = root_dir.join("schema");
    fs::create_dir_all(&schema_dir)?;

    // Create minimal config with invalid database URL to test error handling
    let config_input = ConfigInput {
        databases: Some(DatabasesInput {
            dev_url: Some("postgres://invalid-host:9999/invalid-db".to_string()),
            shadow_url: None,
            target_url: None,
            shadow: Some(ShadowDatabaseInput {
                auto: Some(true),
                url: None,
                docker: None,
            }),
        }),
        directories: Some(DirectoriesInput {
            schema_dir: Some("schema".to_string()),
            migrations_dir: None,
            baselines_dir: None,
            roles_file: None,
        }),
        objects: None,
        migration: None,
        schema: None,
        docker: None,
    };

    let config = ConfigBuilder::new().with_file(config_input).resolve()?;

    // Test that apply command fails gracefully with invalid config
    let result = cmd_apply(&config, root_dir, ExecutionMode::DryRun).await;
    assert!(
        result.is_err(),
        "Apply command should fail with invalid database URL"
    );

    let error_msg = result.unwrap_err().to_string();
    assert!(!error_msg.is_empty(), "Error message should not be empty");

    Ok(())
}

/// Test configuration validation for apply command
#[test]
fn test_apply_command_configuration_requirements() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let schema_dir = temp_dir.path().join("schema");
    fs::create_dir_all(&schema_dir)?;

    // Test that configuration can be created for apply command
    let config_input = ConfigInput {
        databases: Some(DatabasesInput {
            dev_url: Some("postgres://localhost/test_dev".to_string()),
            shadow_url: None,
            target_url: None,
            shadow: Some(ShadowDatabaseInput {
                auto: Some(true),
                url: None,
                docker: None,
            }),
        }),
        directories: Some(DirectoriesInput {
            schema_dir: Some(schema_dir.to_string_lossy().to_string()),
            migrations_dir: None,
            baselines_dir: None,
            roles_file: None,
        }),
        objects: None,
        migration: None,
        schema: None,
        docker: None,
    };

    // Verify config can be built successfully
    let config = ConfigBuilder::new().with_file(config_input).resolve()?;

    // Basic validation that required fields exist
    assert!(!config.databases.dev.is_empty());
    assert!(!config.directories.schema.to_string().is_empty());

    Ok(())
}

// Note: Integration tests for actual apply command execution would be better suited
// for the integration test suite, as they require complex database setup and
// verification of actual schema changes.
