use crate::actor::{Details, RichText};
use crate::mapping::markdown::{body_text, single_line};
use crate::source::CharacterView;

pub const SOURCE_LABEL: &str = "DiceCloud";

pub fn map_details(view: &CharacterView<'_>) -> Details {
    let character = &view.doc.character;
    Details {
        alignment: single_line(&character.alignment),
        race: single_line(&character.race),
        background: body_text(&character.backstory),
        biography: RichText {
            value: body_text(&character.description),
        },
        personality: body_text(&character.personality),
        ideal: body_text(&character.ideals),
        bond: body_text(&character.bonds),
        flaw: body_text(&character.flaws),
        appearance: String::new(),
        level: view.total_level(),
        source: SOURCE_LABEL.to_string(),
    }
}
