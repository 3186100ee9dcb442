mod common;

use std::collections::BTreeSet;

use localkit::env::RootEnv;
use localkit::profile::{ProfileSet, all_profiles};

#[test]
fn exact_token_membership() {
    let env = RootEnv::from_pairs([("COMPOSE_PROFILES", "supabase,dify")]);
    let profiles = env.profiles();

    assert!(profiles.is_enabled("supabase"));
    assert!(profiles.is_enabled("dify"));
    assert!(!profiles.is_enabled("supa"));
    assert!(!profiles.is_enabled("supabase,dify"));
}

#[test]
fn missing_key_enables_nothing() {
    let profiles = RootEnv::default().profiles();

    assert!(profiles.is_empty());
    assert!(!profiles.is_enabled("supabase"));
}

#[test]
fn empty_value_enables_nothing() {
    let env = RootEnv::from_pairs([("COMPOSE_PROFILES", "")]);

    assert!(!env.profiles().is_enabled("supabase"));
    assert!(!env.profiles().is_enabled("dify"));
}

#[test]
fn single_profile() {
    let profiles = ProfileSet::parse("n8n");

    assert!(profiles.is_enabled("n8n"));
    assert_eq!(profiles.iter().collect::<Vec<_>>(), vec!["n8n"]);
}

#[test]
fn all_profiles_unions_every_service() {
    let dir = tempfile::tempdir().unwrap();
    common::write(
        dir.path(),
        "docker-compose.local.yml",
        r#"
services:
  n8n:
    image: n8nio/n8n
    profiles: ["n8n"]
  flowise:
    image: flowiseai/flowise
    profiles:
      - flowise
      - n8n
  postgres:
    image: postgres:16
  ollama-cpu:
    image: ollama/ollama
    profiles: ["cpu"]
    deploy:
      resources: {}
"#,
    );

    let profiles = all_profiles(&dir.path().join("docker-compose.local.yml")).unwrap();

    assert_eq!(
        profiles,
        BTreeSet::from(["cpu".to_string(), "flowise".to_string(), "n8n".to_string()])
    );
}

#[test]
fn all_profiles_follows_merge_keys() {
    let dir = tempfile::tempdir().unwrap();
    common::write(
        dir.path(),
        "docker-compose.local.yml",
        r#"
x-ollama: &service-ollama
  image: ollama/ollama
  profiles: ["gpu-nvidia"]

x-init: &init-ollama
  image: ollama/ollama
  profiles: ["gpu-amd"]

services:
  ollama-gpu:
    <<: *service-ollama
  ollama-pull-gpu-amd:
    <<: *init-ollama
  ollama-cpu:
    <<: *service-ollama
    profiles: ["cpu"]
"#,
    );

    let profiles = all_profiles(&dir.path().join("docker-compose.local.yml")).unwrap();

    assert_eq!(
        profiles,
        BTreeSet::from([
            "cpu".to_string(),
            "gpu-amd".to_string(),
            "gpu-nvidia".to_string()
        ])
    );
}

#[test]
fn all_profiles_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    let profiles = all_profiles(&dir.path().join("nope.yml")).unwrap();

    assert!(profiles.is_empty());
}

#[test]
fn all_profiles_without_services_key_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    common::write(dir.path(), "compose.yml", "volumes:\n  data: {}\n");

    assert!(all_profiles(&dir.path().join("compose.yml")).unwrap().is_empty());
}

#[test]
fn all_profiles_empty_document_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    common::write(dir.path(), "compose.yml", "");

    assert!(all_profiles(&dir.path().join("compose.yml")).unwrap().is_empty());
}

#[test]
fn all_profiles_null_service_bodies() {
    let dir = tempfile::tempdir().unwrap();
    common::write(dir.path(), "compose.yml", "services:\n  bare:\n  tagged:\n    profiles: [gpu]\n");

    let profiles = all_profiles(&dir.path().join("compose.yml")).unwrap();

    assert_eq!(profiles, BTreeSet::from(["gpu".to_string()]));
}

#[test]
fn all_profiles_reads_fresh_each_call() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compose.yml");
    common::write(dir.path(), "compose.yml", "services:\n  a:\n    profiles: [one]\n");
    assert!(all_profiles(&path).unwrap().contains("one"));

    common::write(dir.path(), "compose.yml", "services:\n  a:\n    profiles: [two]\n");
    let profiles = all_profiles(&path).unwrap();
    assert!(profiles.contains("two"));
    assert!(!profiles.contains("one"));
}

#[test]
fn all_profiles_rejects_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    common::write(dir.path(), "compose.yml", "services: [unclosed\n");

    assert!(all_profiles(&dir.path().join("compose.yml")).is_err());
}
