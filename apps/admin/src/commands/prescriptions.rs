//! # Prescription Commands
//!
//! `check` runs every validator on a form file without touching the API:
//!
//! ```text
//! $ optica-admin prescriptions check rx.json
//! error: 2 fields need attention
//! warning: rightEye.axis: Axis is required when a cylinder is given
//! warning: leftEye.addition: Addition is required for multifocal lenses
//! ```

use chrono::NaiveDate;
use optica_api::PageRequest;
use optica_core::prescription::{EyeMeasurement, Prescription, PrescriptionForm};
use optica_core::{CoreError, EntityId};
use tracing::debug;

use super::{or_dash, table, Outcome};
use crate::error::AppResult;
use crate::notify::Notice;
use crate::state::AppState;

pub async fn list(state: &AppState, client: Option<EntityId>, page: &PageRequest) -> AppResult<Outcome> {
    state.require_login().await?;
    let prescriptions = match client {
        Some(client_id) => state.client.prescriptions().for_client(client_id).await?,
        None => state.client.prescriptions().list(page).await?.content,
    };
    Ok(Outcome::output(render_list(&prescriptions, state.today())))
}

/// Validates a form offline.
pub fn check(form: PrescriptionForm, today: NaiveDate) -> AppResult<Outcome> {
    debug!(client_id = ?form.client_id, "prescriptions check command");
    form.validate(today).map_err(CoreError::Fields)?;
    Ok(Outcome::notice(Notice::success("Prescription is valid")))
}

pub async fn create(state: &AppState, form: PrescriptionForm) -> AppResult<Outcome> {
    state.require_login().await?;
    let prescription = state.client.prescriptions().create(form).await?;
    Ok(Outcome::output(render_prescription(&prescription))
        .with_notice(Notice::success(format!("Prescription {} registered", prescription.id))))
}

pub fn render_list(prescriptions: &[Prescription], today: NaiveDate) -> String {
    if prescriptions.is_empty() {
        return "No prescriptions found\n".to_string();
    }
    let mut rows = vec![["ID", "CLIENT", "DOCTOR", "CRM", "ISSUED", "VALID UNTIL", "LENS"]
        .map(String::from)
        .to_vec()];
    rows.extend(prescriptions.iter().map(|p| {
        let valid_until = match p.valid_until {
            Some(until) if p.is_expired(today) => format!("{until} (expired)"),
            other => or_dash(other),
        };
        vec![
            p.id.to_string(),
            p.client_id.to_string(),
            p.doctor_name.clone(),
            p.crm.clone(),
            p.issued_on.to_string(),
            valid_until,
            p.lens_type.to_string(),
        ]
    }));
    table(&rows)
}

pub fn render_prescription(p: &Prescription) -> String {
    let mut out = format!(
        "Prescription #{} for client {}\nDr. {} (CRM {}), issued {}, {}\n",
        p.id, p.client_id, p.doctor_name, p.crm, p.issued_on, p.lens_type
    );
    let mut rows = vec![["EYE", "SPH", "CYL", "AXIS", "DNP", "ADD", "OC"].map(String::from).to_vec()];
    rows.push(eye_row("OD", &p.right_eye));
    rows.push(eye_row("OS", &p.left_eye));
    out.push_str(&table(&rows));
    out
}

fn eye_row(label: &str, eye: &EyeMeasurement) -> Vec<String> {
    vec![
        label.to_string(),
        or_dash(eye.spherical),
        or_dash(eye.cylindrical),
        or_dash(eye.axis),
        or_dash(eye.dnp),
        or_dash(eye.addition),
        or_dash(eye.optical_center),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use optica_core::LensType;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_check_reports_every_field() {
        let mut form = PrescriptionForm::new(4);
        form.doctor_name = "Dr. Paulo Mendes".into();
        form.crm = "12".into();
        form.issued_on = Some(today());
        form.lens_type = LensType::Multifocal;

        let err = check(form, today()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let paths: Vec<&str> = err.fields.iter().map(|(path, _)| path.as_str()).collect();
        assert!(paths.contains(&"crm"));
        assert!(paths.contains(&"rightEye.addition"));
        assert!(paths.contains(&"leftEye.addition"));
    }

    #[test]
    fn test_check_accepts_valid_form() {
        let mut form = PrescriptionForm::new(4);
        form.doctor_name = "Dr. Paulo Mendes".into();
        form.crm = "54321".into();
        form.issued_on = Some(today());
        form.right_eye.spherical = "-1.50".into();

        let outcome = check(form, today()).unwrap();
        assert_eq!(outcome.notices, vec![Notice::success("Prescription is valid")]);
    }

    #[test]
    fn test_render_list_flags_expired() {
        let prescription = Prescription {
            id: 9,
            client_id: 4,
            doctor_name: "Dr. Paulo Mendes".into(),
            crm: "54321".into(),
            issued_on: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2025, 1, 10),
            lens_type: LensType::Monofocal,
            right_eye: EyeMeasurement::default(),
            left_eye: EyeMeasurement::default(),
            notes: None,
        };
        let text = render_list(&[prescription], today());
        assert!(text.contains("2025-01-10 (expired)"));
    }
}
