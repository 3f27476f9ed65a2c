use chrono::Utc;

/// Идентификатор заявки для отображения клиенту. Не используется как ключ
/// хранения: документу идентификатор назначает бекенд. Случайный суффикс
/// разводит заявки, попавшие в одну миллисекунду.
pub fn generate_lead_id() -> String {
    format!(
        "lead_{}_{:08x}",
        Utc::now().timestamp_millis(),
        fastrand::u32(..)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_id_has_expected_shape() {
        let id = generate_lead_id();
        assert!(id.starts_with("lead_"));
        assert!(id.len() > "lead_".len());
    }

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(generate_lead_id(), generate_lead_id());
    }
}
