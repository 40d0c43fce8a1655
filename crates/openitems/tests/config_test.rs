//! The shipped example configuration must stay loadable.

use openitems::config::{Config, MailTransport};
use openitems_core::Measure;
use std::path::PathBuf;

const EXAMPLE: &str = include_str!("../config/openitems.example.toml");

#[test]
fn test_example_config_parses() {
    let config = Config::from_toml_str(EXAMPLE).unwrap();

    assert_eq!(config.source.delimiter_byte().unwrap(), b';');
    let queries: Vec<_> = config.source.queries.keys().map(String::as_str).collect();
    assert_eq!(
        queries,
        ["lancamentos_em_aberto", "faculdade_sebrae", "baixado_parcialmente"]
    );
    assert_eq!(config.export.prefix, "lancamentos_abertos");
    assert_eq!(config.export.directory, PathBuf::from("/var/lib/openitems/out"));

    assert_eq!(config.mail.transport, MailTransport::Smtp);
    assert_eq!(config.mail.to.addresses(), ["contasareceber@example.com"]);
    assert_eq!(config.mail.cc.addresses().len(), 5);
}

#[test]
fn test_example_layout() {
    let layout = Config::from_toml_str(EXAMPLE).unwrap().layout();

    let titles: Vec<_> = layout.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        ["LANÇAMENTOS EM ABERTO", "FACULDADE SEBRAE", "BAIXADO PARCIALMENTE"]
    );

    let open = &layout.sections[0];
    assert_eq!(open.group_by, "TIPO PAGAMENTO");
    assert_eq!(open.count_field.as_deref(), Some("QUANTIDADE"));
    assert_eq!(open.summary[0].source, Measure::Count);
    assert_eq!(
        open.summary[1].source,
        Measure::Sum("VALOR ORIGINAL TOTAL".to_string())
    );
    assert_eq!(open.columns.len(), 3);

    let settled = &layout.sections[2];
    assert!(settled.count_field.is_none());
    assert_eq!(settled.summary.len(), 1);

    let headline = layout.headline.unwrap();
    assert_eq!(headline.top_client.section, "baixado");
    assert_eq!(headline.top_faculty_type.field, "ORIGINAL");
}
