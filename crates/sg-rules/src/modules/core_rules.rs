use crate::registry::{RegistryBuilder, RuleModule};
use crate::rules::{
    custom_field_checkbox, custom_field_date, custom_field_number, custom_field_select,
    custom_field_text, email, lives_in, participation, registration_completed_at, role,
};

/// User attributes, custom fields and participation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreRules;

impl RuleModule for CoreRules {
    fn name(&self) -> &'static str {
        "core"
    }

    fn register(&self, registry: &mut RegistryBuilder) {
        for descriptor in [
            &email::DESCRIPTOR,
            &role::DESCRIPTOR,
            &registration_completed_at::DESCRIPTOR,
            &lives_in::DESCRIPTOR,
            &custom_field_text::DESCRIPTOR,
            &custom_field_select::DESCRIPTOR,
            &custom_field_checkbox::DESCRIPTOR,
            &custom_field_date::DESCRIPTOR,
            &custom_field_number::DESCRIPTOR,
            &participation::IDEA_STATUS,
            &participation::TOPIC,
            &participation::PROJECT,
        ] {
            registry.register(descriptor);
        }
    }
}
