use std::collections::BTreeMap;

use cardops_model::{
    FailureKind, FieldIssue, FieldSpec, Grid, RawRecord, RowDiagnostic, Rule, ScreenSpec, Step,
    ValidatedRecord,
};

fn status_screen() -> ScreenSpec {
    ScreenSpec {
        id: "alterar_status_cartao".to_string(),
        name: "Alterar Status do Cartão".to_string(),
        title: "PLANILHA PARA ALTERAÇÃO DE STATUS DO CARTÃO".to_string(),
        operation: "Alterar_Status_Cartao".to_string(),
        keywords: vec!["OBRIGATÓRIO".to_string(), "Exemplo:".to_string()],
        fields: vec![
            FieldSpec::new("cpf", "CPF").with_step(Rule::DigitsOnly),
            FieldSpec::new("nome", "Nome Completo"),
            FieldSpec::new("movimentacao", "Tipo de Movimentação").optional(),
        ],
    }
}

#[test]
fn mapping_follows_field_order() {
    let mapping = status_screen().mapping();
    assert_eq!(mapping.len(), 3);
    assert_eq!(
        mapping.columns().collect::<Vec<_>>(),
        vec!["CPF", "Nome Completo", "Tipo de Movimentação"]
    );
    assert_eq!(mapping.column("nome"), Some("Nome Completo"));
    assert_eq!(mapping.field_for_column("CPF"), Some("cpf"));
    assert_eq!(mapping.field_for_column("Matrícula"), None);
}

#[test]
fn requirement_labels() {
    let screen = status_screen();
    let labels: Vec<_> = screen
        .fields
        .iter()
        .map(FieldSpec::requirement_label)
        .collect();
    assert_eq!(labels, vec!["OBRIGATÓRIO", "OBRIGATÓRIO", "OPCIONAL"]);
}

#[test]
fn steps_deserialize_from_toml() {
    #[derive(serde::Deserialize)]
    struct Wrapper {
        steps: Vec<Step>,
    }

    let parsed: Wrapper = toml::from_str(
        r#"
        steps = [
            { op = "digits_only" },
            { op = "exact_length", len = 11, message = "CPF deve conter 11 dígitos." },
            { op = "title_case", strip_diacritics = true },
            { op = "one_of", values = ["ACC", "A"] },
        ]
        "#,
    )
    .expect("parse steps");

    assert_eq!(parsed.steps[0], Step::new(Rule::DigitsOnly));
    assert_eq!(
        parsed.steps[1],
        Step::new(Rule::ExactLength { len: 11 }).with_message("CPF deve conter 11 dígitos.")
    );
    assert_eq!(
        parsed.steps[2].rule,
        Rule::TitleCase {
            strip_diacritics: true
        }
    );
    assert!(parsed.steps[2].rule.is_transform());
    assert_eq!(parsed.steps[3].rule.name(), "one_of");
}

#[test]
fn raw_record_defaults_missing_fields_to_empty() {
    let record = RawRecord::new(3).with_value("cpf", "52998224725");
    assert_eq!(record.get("cpf"), "52998224725");
    assert_eq!(record.get("nome"), "");
    assert_eq!(record.source_row, 3);
}

#[test]
fn grid_blankness_ignores_whitespace() {
    let grid = Grid::new(vec![vec![" ".to_string()], vec![], vec!["\t".to_string()]]);
    assert!(grid.is_blank());
    assert_eq!(grid.len(), 3);
    assert_eq!(grid.width(), 1);

    let grid = Grid::new(vec![vec![String::new(), "x".to_string()]]);
    assert!(!grid.is_blank());
}

#[test]
fn diagnostics_serialize_with_kind_tags() {
    let diagnostic = RowDiagnostic::new(
        3,
        vec![FieldIssue {
            field: "cpf".to_string(),
            column: "CPF".to_string(),
            kind: FailureKind::Length {
                expected: 11,
                actual: 10,
            },
            message: "CPF deve conter 11 dígitos.".to_string(),
        }],
    );
    let json = serde_json::to_value(&diagnostic).expect("serialize");
    assert_eq!(json["row"], 3);
    assert_eq!(json["issues"][0]["kind"]["kind"], "length");
    assert_eq!(json["issues"][0]["kind"]["expected"], 11);
}

#[test]
fn validated_record_serializes_as_plain_map() {
    let record = ValidatedRecord::new(BTreeMap::from([
        ("cpf".to_string(), "52998224725".to_string()),
        ("nome".to_string(), "Maria Silva".to_string()),
    ]));
    assert_eq!(
        serde_json::to_string(&record).expect("serialize"),
        r#"{"cpf":"52998224725","nome":"Maria Silva"}"#
    );
}
