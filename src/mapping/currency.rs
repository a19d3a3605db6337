use crate::actor::Currency;
use crate::config::TranslatorConfig;
use crate::source::CharacterView;

/// Coin count for one denomination: quantity of the first item with the configured display name.
fn coins(view: &CharacterView<'_>, config: &TranslatorConfig, denomination: &str) -> i64 {
    let Some(display_name) = config.currency.get(denomination) else {
        return 0;
    };
    view.items()
        .find(|item| &item.name == display_name)
        .map(|item| item.quantity)
        .unwrap_or(0)
}

pub fn map_currency(view: &CharacterView<'_>, config: &TranslatorConfig) -> Currency {
    Currency {
        cp: coins(view, config, "cp"),
        sp: coins(view, config, "sp"),
        ep: coins(view, config, "ep"),
        gp: coins(view, config, "gp"),
        pp: coins(view, config, "pp"),
    }
}
