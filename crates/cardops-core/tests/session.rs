use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::Write;

use cardops_core::{ImportSession, Payload, SessionError, StagingState, SubmitError, Submitter};
use cardops_ingest::IngestError;
use cardops_standards::ScreenRegistry;
use cardops_validate::CONTRACT_FIELD;

const STATUS_CSV: &str = "\
;PLANILHA PARA ALTERAÇÃO DE STATUS DO CARTÃO;\r
\r
CPF;Nome Completo;Tipo de Movimentação\r
OBRIGATÓRIO;OBRIGATÓRIO;OBRIGATÓRIO\r
529.982.247-25;maria silva;Ativar\r
52998224724;Maria;Ativar\r
11144477735;João da Silva;Bloquear\r
11144477735;Ana Souza;Suspender\r
52998224725;Pedro Alves;cancelar\r
";

fn session() -> ImportSession {
    let registry = ScreenRegistry::load_default().expect("load screens");
    ImportSession::open(&registry, "alterar_status_cartao").expect("open session")
}

fn with_contract() -> ImportSession {
    let mut session = session();
    session.set_company_field(CONTRACT_FIELD, "12.345.678/0001-90");
    session
}

fn form(cpf: &str, nome: &str, movimentacao: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("cpf".to_string(), cpf.to_string()),
        ("nome".to_string(), nome.to_string()),
        ("movimentacao".to_string(), movimentacao.to_string()),
    ])
}

#[derive(Default)]
struct Recording {
    payloads: RefCell<Vec<Payload>>,
    fail: bool,
}

impl Submitter for Recording {
    fn submit(&self, payload: &Payload) -> Result<(), SubmitError> {
        self.payloads.borrow_mut().push(payload.clone());
        if self.fail {
            return Err(SubmitError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        Ok(())
    }
}

#[test]
fn partial_import_appends_after_existing_entries() {
    let mut session = with_contract();
    session
        .register(&form("52998224725", "Ana Lima", "Inativar"))
        .expect("manual entry");

    let report = session
        .import_bytes("status.csv", STATUS_CSV.as_bytes())
        .expect("import");

    assert_eq!(report.header_index, 2);
    assert_eq!(report.rows, 5);
    assert_eq!(report.accepted, 3);
    assert_eq!(
        report.rejected.iter().map(|d| d.row).collect::<Vec<_>>(),
        vec![6, 8]
    );
    assert_eq!(
        report.success_message().as_deref(),
        Some("Total de 3 registros válidos foram importados.")
    );
    assert_eq!(report.error_messages().len(), 2);

    let names: Vec<_> = session
        .table()
        .entries()
        .iter()
        .filter_map(|entry| entry.get("nome"))
        .collect();
    assert_eq!(
        names,
        vec!["Ana Lima", "Maria Silva", "João Da Silva", "Pedro Alves"]
    );
    assert_eq!(
        session.table().entries()[3].get("movimentacao"),
        Some("Cancelar")
    );
    assert!(!session.upload_pending());
}

#[test]
fn upload_requires_a_valid_contract_first() {
    let mut session = session();
    session.set_company_field(CONTRACT_FIELD, "123");
    let err = session
        .import_bytes("status.csv", STATUS_CSV.as_bytes())
        .expect_err("contract missing");
    assert!(matches!(err, SessionError::CompanyRequiredForUpload { .. }));
    assert_eq!(
        err.user_message(),
        "Por favor, preencha o N° do contrato antes de fazer o upload do arquivo."
    );
    assert!(err.field_messages().contains_key(CONTRACT_FIELD));
    assert!(session.table().is_empty());
    assert!(!session.upload_pending());
}

#[test]
fn structural_failures_leave_the_table_untouched() {
    let mut session = with_contract();
    session
        .register(&form("52998224725", "Ana Lima", "Inativar"))
        .expect("manual entry");

    let err = session
        .import_bytes("status.csv", "Nome;Outro\r\nAna;x\r\n".as_bytes())
        .expect_err("no header");
    assert!(matches!(
        err,
        SessionError::Ingest(IngestError::HeaderNotFound { .. })
    ));

    let err = session
        .import_bytes(
            "status.csv",
            "CPF;Nome Completo;Tipo de Movimentação\r\n\r\n;;\r\n".as_bytes(),
        )
        .expect_err("no rows");
    assert!(matches!(err, SessionError::NoDataRows));

    let err = session
        .import_bytes("status.pdf", b"%PDF")
        .expect_err("unsupported");
    assert_eq!(
        err.user_message(),
        "Formato de arquivo inválido. Apenas arquivos .csv e .xlsx são aceitos."
    );

    assert_eq!(session.table().len(), 1);
    assert!(!session.upload_pending());
}

#[test]
fn import_path_reads_from_disk() {
    let mut file = tempfile::Builder::new()
        .suffix(".CSV")
        .tempfile()
        .expect("temp file");
    file.write_all(STATUS_CSV.as_bytes()).expect("write csv");

    let mut session = with_contract();
    let report = session.import_path(file.path()).expect("import");
    assert_eq!(report.accepted, 3);
}

#[test]
fn manual_entry_collects_company_and_record_errors() {
    let mut session = session();
    let err = session
        .register(&form("11111111111", "Maria", "Ativar"))
        .expect_err("invalid entry");
    let messages = err.field_messages();
    assert_eq!(
        messages.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["cpf", "nome", CONTRACT_FIELD]
    );
    assert_eq!(messages["cpf"], "CPF inválido.");
    assert!(session.table().is_empty());
}

#[test]
fn edit_replaces_entry_and_restores_company() {
    let mut session = with_contract();
    session
        .register(&form("52998224725", "Ana Lima", "Inativar"))
        .expect("first");
    session
        .register(&form("11144477735", "Bruno Costa", "Ativar"))
        .expect("second");

    session.set_company_field(CONTRACT_FIELD, "");
    let loaded = session.edit(0).expect("edit");
    assert_eq!(loaded["nome"], "Ana Lima");
    assert_eq!(session.company_inputs()[CONTRACT_FIELD], "12345678000190");
    assert_eq!(session.table().state(), StagingState::Editing { index: 0 });

    let index = session
        .register(&form("52998224725", "ana lima souza", "Bloquear"))
        .expect("update");
    assert_eq!(index, 0);
    assert_eq!(session.table().len(), 2);
    assert_eq!(
        session.table().entries()[0].get("nome"),
        Some("Ana Lima Souza")
    );
    assert_eq!(session.table().state(), StagingState::Populated);
}

#[test]
fn submit_sends_screen_fields_only() {
    let mut session = with_contract();
    session
        .register(&form("529.982.247-25", "Ana Lima", "inativar"))
        .expect("entry");

    let recording = Recording::default();
    assert_eq!(session.submit(&recording).expect("submit"), 1);
    let payloads = recording.payloads.borrow();
    insta::assert_json_snapshot!(payloads[0], @r#"
    {
      "contrato": "12345678000190",
      "op": "Alterar_Status_Cartao",
      "value": [
        {
          "cpf": "52998224725",
          "movimentacao": "Inativar",
          "nome": "Ana Lima"
        }
      ]
    }
    "#);
}

#[test]
fn submit_preconditions_and_failures() {
    let mut session = session();
    let recording = Recording::default();

    let err = session.submit(&recording).expect_err("no contract");
    assert_eq!(
        err.user_message(),
        "Por favor, preencha o N° do contrato antes de enviar para a API."
    );

    session.set_company_field(CONTRACT_FIELD, "12345678000190");
    let err = session.submit(&recording).expect_err("empty table");
    assert_eq!(err.user_message(), "Não há dados na tabela para enviar.");
    assert!(recording.payloads.borrow().is_empty());

    session
        .register(&form("52998224725", "Ana Lima", "Inativar"))
        .expect("entry");
    let failing = Recording {
        fail: true,
        ..Recording::default()
    };
    let err = session.submit(&failing).expect_err("server error");
    assert_eq!(err.user_message(), "Erro no envio de dados, tente novamente");
    assert_eq!(session.table().len(), 1);
}
