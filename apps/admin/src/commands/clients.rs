//! # Client Commands

use optica_api::{Page, PageRequest};
use optica_core::{Client, ClientRequest, EntityId};
use tracing::debug;

use super::{or_dash, table, Outcome};
use crate::error::AppResult;
use crate::notify::Notice;
use crate::state::AppState;

pub async fn list(state: &AppState, page: &PageRequest) -> AppResult<Outcome> {
    debug!(page = page.page, search = ?page.search, "clients list command");
    state.require_login().await?;
    let clients = state.client.clients().list(page).await?;
    Ok(Outcome::output(render_list(&clients, page)))
}

pub async fn show(state: &AppState, id: EntityId) -> AppResult<Outcome> {
    state.require_login().await?;
    let client = state.client.clients().get(id).await?;
    let prescriptions = state.client.prescriptions().for_client(id).await?;

    let mut out = render_client(&client);
    out.push_str(&format!("Prescriptions  {}\n", prescriptions.len()));
    let today = state.today();
    let expired = prescriptions.iter().filter(|p| p.is_expired(today)).count();

    let outcome = Outcome::output(out);
    Ok(if !prescriptions.is_empty() && expired == prescriptions.len() {
        outcome.with_notice(Notice::warning("Every prescription of this client has expired"))
    } else {
        outcome
    })
}

pub async fn create(state: &AppState, request: ClientRequest) -> AppResult<Outcome> {
    state.require_login().await?;
    let client = state.client.clients().create(request).await?;
    Ok(Outcome::output(render_client(&client))
        .with_notice(Notice::success(format!("Client {} registered", client.id))))
}

pub fn render_list(page: &Page<Client>, request: &PageRequest) -> String {
    if page.is_empty() {
        return "No clients found\n".to_string();
    }
    let mut rows = vec![vec![
        "ID".to_string(),
        "NAME".to_string(),
        "CPF".to_string(),
        "PHONE".to_string(),
        "E-MAIL".to_string(),
    ]];
    rows.extend(page.content.iter().map(|c| {
        vec![
            c.id.to_string(),
            c.name.clone(),
            or_dash(c.cpf.as_deref()),
            or_dash(c.phone.as_deref()),
            or_dash(c.email.as_deref()),
        ]
    }));
    let mut out = table(&rows);
    out.push_str(&format!(
        "page {} of {} ({} clients)\n",
        request.page + 1,
        page.total_pages(request.size).max(1),
        page.total_elements
    ));
    out
}

pub fn render_client(client: &Client) -> String {
    let rows = vec![
        vec!["Client".to_string(), format!("{} (#{})", client.name, client.id)],
        vec!["CPF".to_string(), or_dash(client.cpf.as_deref())],
        vec!["Birth date".to_string(), or_dash(client.birth_date)],
        vec!["Phone".to_string(), or_dash(client.phone.as_deref())],
        vec!["E-mail".to_string(), or_dash(client.email.as_deref())],
        vec!["Address".to_string(), or_dash(client.address.as_deref())],
    ];
    table(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: 3,
            name: "Ana Souza".into(),
            cpf: Some("529.982.247-25".into()),
            birth_date: None,
            phone: None,
            email: Some("ana@mail.com".into()),
            address: None,
            created_at: None,
        }
    }

    #[test]
    fn test_render_client() {
        let text = render_client(&client());
        assert!(text.starts_with("Client      Ana Souza (#3)\n"));
        assert!(text.contains("Phone       -\n"));
    }

    #[test]
    fn test_render_list() {
        let page = Page {
            content: vec![client()],
            total_elements: 41,
        };
        let text = render_list(&page, &PageRequest::new(1, 20));
        assert!(text.contains("529.982.247-25"));
        assert!(text.ends_with("page 2 of 3 (41 clients)\n"));
    }

    #[test]
    fn test_render_empty_list() {
        let page = Page::<Client> {
            content: Vec::new(),
            total_elements: 0,
        };
        assert_eq!(render_list(&page, &PageRequest::default()), "No clients found\n");
    }
}
