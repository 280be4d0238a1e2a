//! Inventory rendering tests, pinned with literal output for both modes.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use runbook::environment::Environment;
use runbook::inventory::{InventoryGenerator, InventoryMode};
use runbook::runbook::HostEntry;

fn hosts() -> Vec<HostEntry> {
    vec![
        HostEntry::new("localhost"),
        HostEntry::new("db.internal").with_override(
            Environment::new()
                .with_user("postgres")
                .with_become(false),
        ),
    ]
}

#[test]
fn test_address_aware_inventory() {
    let doc = InventoryGenerator::new(InventoryMode::AddressAware).generate(&hosts(), &full_env());
    assert_eq!(
        doc.render(),
        "[managed]\n\
         localhost ansible_connection=local ansible_python_interpreter=/usr/bin/python3 ansible_become=true\n\
         db.internal ansible_user=postgres ansible_ssh_private_key_file=~/.ssh/id_ed25519 ansible_python_interpreter=/usr/bin/python3 ansible_become=false\n"
    );
}

#[test]
fn test_uniform_inventory() {
    let doc = InventoryGenerator::new(InventoryMode::Uniform).generate(&hosts(), &full_env());
    assert_eq!(
        doc.render(),
        "[managed]\n\
         localhost ansible_user=root ansible_ssh_private_key_file=~/.ssh/id_ed25519 ansible_python_interpreter=/usr/bin/python3 ansible_become=true\n\
         db.internal ansible_user=postgres ansible_ssh_private_key_file=~/.ssh/id_ed25519 ansible_python_interpreter=/usr/bin/python3 ansible_become=false\n"
    );
}

#[test]
fn test_absent_fields_are_omitted() {
    let doc = InventoryGenerator::default().generate(
        &[HostEntry::new("web1"), HostEntry::new("localhost")],
        &Environment::new().with_user("ops"),
    );
    assert_eq!(
        doc.lines(),
        vec![
            "[managed]".to_string(),
            "web1 ansible_user=ops".to_string(),
            "localhost ansible_connection=local".to_string(),
        ]
    );
}

#[test]
fn test_values_with_spaces_are_quoted() {
    let doc = InventoryGenerator::default().generate(
        &[HostEntry::new("web1")],
        &Environment::new().with_ssh_key("/keys/my key"),
    );
    assert_eq!(
        doc.lines()[1],
        "web1 ansible_ssh_private_key_file='/keys/my key'"
    );
}

#[test]
fn test_quoted_values_survive_shlex_split() {
    let doc = InventoryGenerator::default().generate(
        &[HostEntry::new("win1")],
        &Environment::new()
            .with_ssh_key(r"C:\keys\id")
            .with_python("/opt/py 3/bin/python"),
    );

    let tokens = shell_words::split(&doc.lines()[1]).unwrap();
    assert_eq!(
        tokens,
        vec![
            "win1".to_string(),
            r"ansible_ssh_private_key_file=C:\keys\id".to_string(),
            "ansible_python_interpreter=/opt/py 3/bin/python".to_string(),
        ]
    );
}

#[test]
fn test_host_order_is_preserved() {
    let addresses = ["c", "a", "b", "localhost", "a"];
    let entries: Vec<HostEntry> = addresses.iter().map(|a| HostEntry::new(*a)).collect();
    let doc = InventoryGenerator::new(InventoryMode::Uniform).generate(&entries, &full_env());

    let rendered: Vec<&str> = doc.hosts().iter().map(|h| h.address()).collect();
    assert_eq!(rendered, addresses);
}
