//! CSV rendering of audit records

use chrono::SecondsFormat;

use super::error::{AuditError, AuditResult};
use super::models::AuditRecord;

pub const AUDIT_CSV_HEADER: [&str; 12] = [
    "ID",
    "Usuario",
    "Acción",
    "Entidad",
    "Descripción",
    "Estado",
    "Nivel",
    "IP",
    "Endpoint",
    "Método HTTP",
    "Tiempo Respuesta",
    "Fecha Creación",
];

pub const INVENTORY_CSV_HEADER: [&str; 14] = [
    "ID",
    "Fecha",
    "Usuario",
    "Email",
    "Acción",
    "Descripción de la Acción",
    "Título",
    "Autor",
    "Editorial",
    "Género",
    "Stock",
    "Precio",
    "Estado",
    "IP",
];

fn timestamp(record: &AuditRecord) -> String {
    record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn render<const N: usize>(
    header: [&str; N],
    records: &[AuditRecord],
    row: impl Fn(&AuditRecord) -> [String; N],
) -> AuditResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    for record in records {
        writer.write_record(row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AuditError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AuditError::Export(e.to_string()))
}

/// Generic audit log export
pub fn audit_records_to_csv(records: &[AuditRecord]) -> AuditResult<String> {
    render(AUDIT_CSV_HEADER, records, |r| {
        [
            r.id.to_string(),
            r.actor_label().to_string(),
            r.action.to_string(),
            opt(r.entity_type.as_deref()),
            r.description.clone(),
            r.status.to_string(),
            r.level.to_string(),
            opt(r.ip_address.as_deref()),
            opt(r.endpoint.as_deref()),
            opt(r.http_method.as_deref()),
            r.response_time_ms.map(|ms| format!("{}ms", ms)).unwrap_or_default(),
            timestamp(r),
        ]
    })
}

/// Label for the inventory report, e.g. `Libro eliminado: "Foo"`
fn inventory_description(record: &AuditRecord) -> String {
    let label = record.action.inventory_label();
    match record.metadata.as_ref().and_then(|m| m.title.as_deref()) {
        Some(title) => format!("{}: \"{}\"", label, title),
        None => label.to_string(),
    }
}

/// Book inventory export with one column per snapshotted book field
pub fn inventory_records_to_csv(records: &[AuditRecord]) -> AuditResult<String> {
    render(INVENTORY_CSV_HEADER, records, |r| {
        let metadata = r.metadata.as_ref();
        [
            r.id.to_string(),
            timestamp(r),
            r.actor_label().to_string(),
            opt(r.user_email.as_deref()),
            r.action.to_string(),
            inventory_description(r),
            opt(metadata.and_then(|m| m.title.as_deref())),
            opt(metadata.and_then(|m| m.author.as_deref())),
            opt(metadata.and_then(|m| m.publisher.as_deref())),
            opt(metadata.and_then(|m| m.genre.as_deref())),
            opt(metadata.and_then(|m| m.stock)),
            metadata
                .and_then(|m| m.price)
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
            r.status.to_string(),
            opt(r.ip_address.as_deref()),
        ]
    })
}
