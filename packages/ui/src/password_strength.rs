use api::validation::PasswordStrength as Strength;
use dioxus::prelude::*;

use crate::icons::{FaCheck, FaXmark};
use crate::Icon;

/// Live checklist for a password being typed. Renders nothing for an empty
/// password.
#[component]
pub fn PasswordStrength(password: String) -> Element {
    if password.is_empty() {
        return rsx! {};
    }

    let strength = Strength::check(&password);
    let label = strength.label();
    let meter_class = format!("strength strength--{}", label.to_ascii_lowercase());
    let percent = u32::from(strength.score()) * 20;

    rsx! {
        div {
            class: "{meter_class}",
            div {
                class: "strength__bar",
                div { class: "strength__fill", style: "width: {percent}%" }
            }
            small { class: "strength__label", "Password strength: {label}" }
            ul {
                class: "strength__rules",
                for (rule, passed) in strength.rules() {
                    li {
                        key: "{rule}",
                        class: if passed { "rule rule--ok" } else { "rule" },
                        if passed {
                            Icon { icon: FaCheck, width: 10, height: 10 }
                        } else {
                            Icon { icon: FaXmark, width: 10, height: 10 }
                        }
                        " {rule}"
                    }
                }
            }
        }
    }
}
