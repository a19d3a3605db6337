//! Folds a stat's effect list into a final value and an advantage tally.
//!
//! Order of application: the last enabled `base` entry sets the starting value (or the caller's
//! default when there is none), then `add`/`mul` entries are applied strictly in list order, and
//! `advantage`/`disadvantage` entries move a signed tally that is never clamped.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::TranslateError;
use crate::source::{EffectIndex, EffectOperation, EffectRecord};

/// Total class levels times the constitution modifier.
pub const LEVEL_TIMES_CONSTITUTION_MOD: &str = "level * constitutionMod";
/// Unarmored AC: 10 plus the dexterity modifier.
pub const DEXTERITY_ARMOR: &str = "dexterityArmor";

/// Starting score for abilities resolved without a `base` effect.
pub const DEFAULT_ABILITY_SCORE: f64 = 10.0;

/// Ability modifier, truncating toward zero: `trunc((score - 10) / 2)`.
pub fn ability_modifier(score: f64) -> i64 {
    ((score - 10.0) / 2.0).trunc() as i64
}

/// Accumulator of the fold: running value and advantage tally.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    pub value: f64,
    pub advantage: i32,
}

impl Resolution {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            advantage: 0,
        }
    }

    fn with_value(self, value: f64) -> Self {
        Self { value, ..self }
    }

    fn with_advantage(self, delta: i32) -> Self {
        Self {
            advantage: self.advantage + delta,
            ..self
        }
    }
}

/// Character-level inputs named calculations depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharacterContext {
    pub level: u32,
    pub hit_point_adjustment: f64,
}

/// Resolves stats against one character's effect index.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a EffectIndex,
    context: CharacterContext,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a EffectIndex, context: CharacterContext) -> Self {
        Self { index, context }
    }

    pub fn context(&self) -> CharacterContext {
        self.context
    }

    /// Resolve `stat`, starting from `default_base` when no enabled `base` effect exists.
    pub fn resolve(&self, stat: &str, default_base: f64) -> Result<Resolution, TranslateError> {
        self.resolve_tracked(stat, default_base, &mut Vec::new())
    }

    /// Like [`Resolver::resolve`], but a stat with no effects at all quietly keeps the default.
    pub fn resolve_optional(&self, stat: &str, default: f64) -> Result<Resolution, TranslateError> {
        if !self.index.has_stat(stat) {
            return Ok(Resolution::new(default));
        }
        self.resolve(stat, default)
    }

    /// Net advantage per stat, taken from [`Resolver::resolve`]; zero tallies are left out.
    pub fn advantage_tallies(&self) -> Result<BTreeMap<String, i32>, TranslateError> {
        let mut tallies = BTreeMap::new();
        for stat in self.index.stats().filter(|stat| {
            self.index.effects_for(stat).iter().any(|effect| {
                matches!(
                    effect.operation,
                    EffectOperation::Advantage | EffectOperation::Disadvantage
                )
            })
        }) {
            let tally = self.resolve(stat, 0.0)?.advantage;
            if tally != 0 {
                tallies.insert(stat.to_string(), tally);
            }
        }
        Ok(tallies)
    }

    /// Evaluate a named calculation. Unknown names evaluate to 0.
    pub fn calculate(&self, calculation: &str) -> Result<f64, TranslateError> {
        self.calculate_tracked(calculation, &mut Vec::new())
    }

    fn resolve_tracked(
        &self,
        stat: &str,
        default_base: f64,
        active: &mut Vec<String>,
    ) -> Result<Resolution, TranslateError> {
        let enabled: Vec<&EffectRecord> = self
            .index
            .effects_for(stat)
            .iter()
            .filter(|effect| effect.enabled)
            .collect();

        if let Some(effect) = enabled
            .iter()
            .find(|effect| effect.value.is_none() && effect.calculation.is_none())
        {
            return Err(TranslateError::MissingEffectValue {
                stat: effect.stat.clone(),
                operation: format!("{:?}", effect.operation).to_lowercase(),
            });
        }

        active.push(stat.to_string());

        let base = enabled
            .iter()
            .rev()
            .find(|effect| effect.operation == EffectOperation::Base);
        let start = match base {
            Some(effect) => self.effect_value(effect, active)?,
            None => {
                warn!(stat, default_base, "no base effect found, keeping default");
                default_base
            }
        };

        let resolution = enabled
            .iter()
            .filter(|effect| effect.operation != EffectOperation::Base)
            .try_fold(Resolution::new(start), |acc, effect| {
                let next = match effect.operation {
                    EffectOperation::Add => {
                        acc.with_value(acc.value + self.effect_value(effect, active)?)
                    }
                    EffectOperation::Mul => {
                        acc.with_value(acc.value * self.effect_value(effect, active)?)
                    }
                    EffectOperation::Advantage => acc.with_advantage(1),
                    EffectOperation::Disadvantage => acc.with_advantage(-1),
                    EffectOperation::Base => acc,
                    EffectOperation::Unsupported => {
                        warn!(stat, "skipping effect with unsupported operation");
                        acc
                    }
                };
                Ok::<_, TranslateError>(next)
            })?;

        active.pop();
        Ok(resolution)
    }

    fn effect_value(
        &self,
        effect: &EffectRecord,
        active: &mut Vec<String>,
    ) -> Result<f64, TranslateError> {
        match (&effect.value, &effect.calculation) {
            (Some(value), _) => Ok(*value),
            (None, Some(calculation)) => self.calculate_tracked(calculation, active),
            (None, None) => Err(TranslateError::MissingEffectValue {
                stat: effect.stat.clone(),
                operation: format!("{:?}", effect.operation).to_lowercase(),
            }),
        }
    }

    fn calculate_tracked(
        &self,
        calculation: &str,
        active: &mut Vec<String>,
    ) -> Result<f64, TranslateError> {
        match calculation.trim() {
            LEVEL_TIMES_CONSTITUTION_MOD => {
                let Some(constitution) = self.nested_score("constitution", active)? else {
                    return Ok(0.0);
                };
                Ok(f64::from(self.context.level) * ability_modifier(constitution) as f64)
            }
            DEXTERITY_ARMOR => {
                let Some(dexterity) = self.nested_score("dexterity", active)? else {
                    return Ok(0.0);
                };
                Ok(10.0 + ability_modifier(dexterity) as f64)
            }
            other => {
                warn!(calculation = other, "unrecognized calculation, using 0");
                Ok(0.0)
            }
        }
    }

    /// Score of an ability needed by a calculation; `None` when it would recurse into itself.
    fn nested_score(
        &self,
        ability: &str,
        active: &mut Vec<String>,
    ) -> Result<Option<f64>, TranslateError> {
        if active.iter().any(|stat| stat == ability) {
            warn!(ability, chain = ?active, "calculation refers back to a stat being resolved, using 0");
            return Ok(None);
        }
        let resolution = self.resolve_tracked(ability, DEFAULT_ABILITY_SCORE, active)?;
        Ok(Some(resolution.value))
    }
}

/// Resolve one stat without keeping a [`Resolver`] around.
pub fn resolve(
    stat: &str,
    default_base: f64,
    index: &EffectIndex,
    context: CharacterContext,
) -> Result<Resolution, TranslateError> {
    Resolver::new(index, context).resolve(stat, default_base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EffectOperation::{Add, Advantage, Base, Disadvantage, Mul};

    fn index(effects: Vec<EffectRecord>) -> EffectIndex {
        effects.into_iter().collect()
    }

    #[test]
    fn ability_modifier_truncates_toward_zero() {
        assert_eq!(ability_modifier(8.0), -1);
        assert_eq!(ability_modifier(9.0), 0);
        assert_eq!(ability_modifier(10.0), 0);
        assert_eq!(ability_modifier(11.0), 0);
        assert_eq!(ability_modifier(15.0), 2);
        assert_eq!(ability_modifier(3.0), -3);
    }

    #[test]
    fn add_and_mul_apply_in_list_order() {
        let mul_first = index(vec![
            EffectRecord::new("speed", Base, 10.0),
            EffectRecord::new("speed", Mul, 2.0),
            EffectRecord::new("speed", Add, 1.0),
        ]);
        let add_first = index(vec![
            EffectRecord::new("speed", Base, 10.0),
            EffectRecord::new("speed", Add, 1.0),
            EffectRecord::new("speed", Mul, 2.0),
        ]);
        let ctx = CharacterContext::default();
        assert_eq!(resolve("speed", 0.0, &mul_first, ctx).map(|r| r.value).ok(), Some(21.0));
        assert_eq!(resolve("speed", 0.0, &add_first, ctx).map(|r| r.value).ok(), Some(22.0));
    }

    #[test]
    fn last_base_wins_even_when_listed_after_modifiers() {
        let effects = index(vec![
            EffectRecord::new("armor", Base, 12.0),
            EffectRecord::new("armor", Add, 2.0),
            EffectRecord::new("armor", Base, 15.0),
        ]);
        let resolution = resolve("armor", 10.0, &effects, CharacterContext::default())
            .expect("armor should resolve");
        assert_eq!(resolution.value, 17.0);
    }

    #[test]
    fn missing_base_keeps_default_and_disabled_effects_are_ignored() {
        let mut disabled = EffectRecord::new("speed", Base, 99.0);
        disabled.enabled = false;
        let effects = index(vec![disabled, EffectRecord::new("speed", Add, 5.0)]);
        let resolution = resolve("speed", 30.0, &effects, CharacterContext::default())
            .expect("speed should resolve");
        assert_eq!(resolution.value, 35.0);
    }

    #[test]
    fn advantage_tally_is_signed_and_unbounded() {
        let effects = index(vec![
            EffectRecord::new("stealth", Advantage, 1.0),
            EffectRecord::new("stealth", Advantage, 1.0),
            EffectRecord::new("stealth", Advantage, 1.0),
            EffectRecord::new("stealth", Disadvantage, 1.0),
        ]);
        let resolution = resolve("stealth", 0.0, &effects, CharacterContext::default())
            .expect("stealth should resolve");
        assert_eq!(resolution.advantage, 2);
        assert_eq!(resolution.value, 0.0);
    }

    #[test]
    fn advantage_tallies_skip_balanced_and_disabled_stats() {
        let mut disabled = EffectRecord::new("perception", Disadvantage, 1.0);
        disabled.enabled = false;
        let effects = index(vec![
            EffectRecord::new("stealth", Disadvantage, 1.0),
            EffectRecord::new("dexteritySave", Advantage, 1.0),
            EffectRecord::new("dexteritySave", Disadvantage, 1.0),
            EffectRecord::new("perception", Advantage, 1.0),
            disabled,
            EffectRecord::new("speed", Base, 30.0),
        ]);
        let tallies = Resolver::new(&effects, CharacterContext::default())
            .advantage_tallies()
            .expect("tallies should resolve");
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies.get("stealth"), Some(&-1));
        assert_eq!(tallies.get("perception"), Some(&1));
    }

    #[test]
    fn advantage_without_value_or_calculation_is_fatal() {
        let mut amountless = EffectRecord::new("stealth", Advantage, 0.0);
        amountless.value = None;
        let effects = index(vec![amountless]);
        let err = resolve("stealth", 0.0, &effects, CharacterContext::default())
            .expect_err("amountless advantage must fail");
        assert!(matches!(
            err,
            TranslateError::MissingEffectValue { ref operation, .. } if operation == "advantage"
        ));
        let tallies = Resolver::new(&effects, CharacterContext::default()).advantage_tallies();
        assert!(tallies.is_err());
    }

    #[test]
    fn level_times_constitution_mod_resolves_constitution_chain() {
        let effects = index(vec![
            EffectRecord::new("constitution", Base, 14.0),
            EffectRecord::new("constitution", Add, 2.0),
            EffectRecord::new("hitPoints", Base, 8.0),
            EffectRecord::calculated("hitPoints", Add, LEVEL_TIMES_CONSTITUTION_MOD),
        ]);
        let ctx = CharacterContext {
            level: 4,
            hit_point_adjustment: 0.0,
        };
        let resolution = resolve("hitPoints", 0.0, &effects, ctx).expect("hp should resolve");
        assert_eq!(resolution.value, 8.0 + 4.0 * 3.0);
    }

    #[test]
    fn dexterity_armor_is_ten_plus_dexterity_modifier() {
        let effects = index(vec![
            EffectRecord::new("dexterity", Base, 17.0),
            EffectRecord::calculated("armor", Base, DEXTERITY_ARMOR),
        ]);
        let resolution = resolve("armor", 10.0, &effects, CharacterContext::default())
            .expect("armor should resolve");
        assert_eq!(resolution.value, 13.0);
    }

    #[test]
    fn unknown_calculation_yields_zero() {
        let effects = index(vec![
            EffectRecord::new("speed", Base, 30.0),
            EffectRecord::calculated("speed", Add, "strengthMod * 5"),
        ]);
        let resolution = resolve("speed", 30.0, &effects, CharacterContext::default())
            .expect("unknown calculation is not fatal");
        assert_eq!(resolution.value, 30.0);
    }

    #[test]
    fn effect_without_value_or_calculation_is_fatal() {
        let mut broken = EffectRecord::new("speed", Add, 0.0);
        broken.value = None;
        let effects = index(vec![EffectRecord::new("speed", Base, 30.0), broken]);
        let err = resolve("speed", 30.0, &effects, CharacterContext::default())
            .expect_err("missing value must fail");
        assert!(matches!(err, TranslateError::MissingEffectValue { .. }));
    }

    #[test]
    fn self_referencing_calculation_evaluates_to_zero() {
        let effects = index(vec![
            EffectRecord::new("constitution", Base, 12.0),
            EffectRecord::calculated("constitution", Add, LEVEL_TIMES_CONSTITUTION_MOD),
        ]);
        let ctx = CharacterContext {
            level: 3,
            hit_point_adjustment: 0.0,
        };
        let resolution = resolve("constitution", 10.0, &effects, ctx).expect("cycle is not fatal");
        assert_eq!(resolution.value, 12.0);
    }

    #[test]
    fn resolve_optional_skips_absent_stats() {
        let effects = index(vec![EffectRecord::new("flySpeed", Base, 60.0)]);
        let resolver = Resolver::new(&effects, CharacterContext::default());
        assert_eq!(resolver.resolve_optional("swimSpeed", 0.0).map(|r| r.value).ok(), Some(0.0));
        assert_eq!(resolver.resolve_optional("flySpeed", 0.0).map(|r| r.value).ok(), Some(60.0));
    }
}
