//! Brewing activities and their parameter records.
//!
//! An [`Activity`] is one of six kinds, each carrying its own strongly typed
//! parameters. The transformation for a kind is selected by an exhaustive
//! match in [`crate::transform::apply`].
//!
//! Split and merge activities carry cross-graph links ([`SplitLink`],
//! [`MergeLink`]). The variants can be spelled out like any enum, but a
//! recipe only accepts them in pairs created by
//! [`Brewery::split`](crate::Brewery::split) and
//! [`Brewery::merge`](crate::Brewery::merge).
//! [`Brewery::insert_activity`](crate::Brewery::insert_activity) rejects
//! them and [`ProcessParams`] never hands out a mutable link.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::BrewConstants;
use crate::graph::{GraphId, NodeRef};

/// Discriminant of an [`Activity`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivityKind {
    /// Mashing and lautering.
    Mash,
    /// Boiling with hops.
    Boil,
    /// Fermentation.
    Ferment,
    /// Priming and bottling.
    Bottle,
    /// Transfer of part of a flow to another recipe.
    Split,
    /// Combination with a flow of another recipe.
    Merge,
}

impl ActivityKind {
    /// Label given to the state node an activity of this kind produces.
    pub fn output_label(self) -> &'static str {
        match self {
            Self::Mash => "Post-mash wort",
            Self::Boil => "Post-boil wort",
            Self::Ferment => "Flat beer",
            Self::Bottle => "Carbonated beer",
            Self::Split => "Split flow",
            Self::Merge => "Merged flow",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mash => "Mash",
            Self::Boil => "Boil",
            Self::Ferment => "Ferment",
            Self::Bottle => "Bottle",
            Self::Split => "Split",
            Self::Merge => "Merge",
        };
        f.write_str(name)
    }
}

/// Fermentable sugar types accepted as additions or for priming.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sugar {
    /// Table sugar.
    Sucrose,
    /// Corn sugar.
    Dextrose,
    /// Dry malt extract.
    DryMaltExtract,
    /// Liquid malt extract.
    LiquidMaltExtract,
}

impl Sugar {
    /// All sugar types, in addition order.
    pub const ALL: [Sugar; 4] = [
        Sugar::Sucrose,
        Sugar::Dextrose,
        Sugar::DryMaltExtract,
        Sugar::LiquidMaltExtract,
    ];

    /// Extract contributed per kg, relative to sucrose.
    pub fn extract_factor(self, constants: &BrewConstants) -> f64 {
        match self {
            Self::Sucrose => 1.0,
            Self::Dextrose => constants.dextrose_factor,
            Self::DryMaltExtract => constants.dry_extract_factor,
            Self::LiquidMaltExtract => {
                constants.dry_extract_factor * constants.liquid_extract_solids
            }
        }
    }

    /// CO2 produced per unit weight when fully fermented.
    pub fn co2_yield(self, constants: &BrewConstants) -> f64 {
        let sucrose = constants.sucrose_co2_yield;
        match self {
            Self::Sucrose => sucrose,
            Self::Dextrose => sucrose * constants.dextrose_factor,
            Self::DryMaltExtract => sucrose * constants.extract_fermentability,
            Self::LiquidMaltExtract => {
                sucrose * constants.extract_fermentability * constants.liquid_extract_solids
            }
        }
    }
}

/// Quantities of each sugar type.
///
/// Units depend on the activity: kg for boil and fermentation additions,
/// g/L for priming.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SugarAdditions {
    /// Sucrose quantity.
    pub sucrose: f64,
    /// Dextrose quantity.
    pub dextrose: f64,
    /// Dry malt extract quantity.
    pub dry_malt_extract: f64,
    /// Liquid malt extract quantity.
    pub liquid_malt_extract: f64,
}

impl SugarAdditions {
    /// Returns the quantity of one sugar type.
    pub fn get(&self, sugar: Sugar) -> f64 {
        match sugar {
            Sugar::Sucrose => self.sucrose,
            Sugar::Dextrose => self.dextrose,
            Sugar::DryMaltExtract => self.dry_malt_extract,
            Sugar::LiquidMaltExtract => self.liquid_malt_extract,
        }
    }

    /// Sets the quantity of one sugar type.
    pub fn with(mut self, sugar: Sugar, quantity: f64) -> Self {
        let slot = match sugar {
            Sugar::Sucrose => &mut self.sucrose,
            Sugar::Dextrose => &mut self.dextrose,
            Sugar::DryMaltExtract => &mut self.dry_malt_extract,
            Sugar::LiquidMaltExtract => &mut self.liquid_malt_extract,
        };
        *slot = quantity;
        self
    }

    /// Iterates over `(sugar, quantity)` pairs in [`Sugar::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Sugar, f64)> + '_ {
        Sugar::ALL.into_iter().map(|s| (s, self.get(s)))
    }

    /// Returns `true` if no sugar is added.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, q)| q == 0.0)
    }
}

/// One grain bill entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GrainAddition {
    /// Malt variety.
    pub name: String,
    /// Weight in kg.
    pub weight: f64,
    /// Color in EBC.
    pub color: f64,
}

/// Parameters of a mash.
///
/// The mash water is the volume of the input flow.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MashParams {
    /// Grain bill.
    pub grains: Vec<GrainAddition>,
    /// Sparge water in liters.
    pub sparge_water: f64,
}

impl MashParams {
    /// Creates an empty mash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a malt to the grain bill.
    pub fn with_grain(mut self, name: impl Into<String>, weight: f64, color: f64) -> Self {
        self.grains.push(GrainAddition {
            name: name.into(),
            weight,
            color,
        });
        self
    }

    /// Sets the sparge water volume.
    pub fn with_sparge_water(mut self, liters: f64) -> Self {
        self.sparge_water = liters;
        self
    }

    /// Total grain weight in kg.
    pub fn total_grain_weight(&self) -> f64 {
        self.grains.iter().map(|g| g.weight).sum()
    }
}

/// Physical form of a hop addition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HopForm {
    /// Pellets (utilization bonus).
    #[default]
    Pellet,
    /// Whole cones.
    Cone,
    /// Lupulin concentrate.
    Cryo,
}

/// When a hop addition is made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HopUsage {
    /// Added at the start of the boil, before the hot break.
    #[default]
    Forward,
    /// Added after the hot break (utilization bonus).
    AfterHotBreak,
    /// Added in the whirlpool (utilization bonus).
    Whirlpool,
}

/// One hop addition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HopAddition {
    /// Hop variety.
    pub name: String,
    /// Physical form.
    pub form: HopForm,
    /// Weight in grams.
    pub weight: f64,
    /// Alpha acid content in %.
    pub alpha: f64,
    /// Contact time with the boiling wort in minutes.
    pub time: f64,
    /// Addition timing.
    pub usage: HopUsage,
}

impl HopAddition {
    /// Pellet hops added at the start of the boil.
    pub fn pellet(name: impl Into<String>, weight: f64, alpha: f64, time: f64) -> Self {
        Self {
            name: name.into(),
            form: HopForm::Pellet,
            weight,
            alpha,
            time,
            usage: HopUsage::Forward,
        }
    }

    /// Sets the hop form.
    pub fn with_form(mut self, form: HopForm) -> Self {
        self.form = form;
        self
    }

    /// Sets the addition timing.
    pub fn with_usage(mut self, usage: HopUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Parameters of a boil.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoilParams {
    /// Boil time in minutes.
    pub time: f64,
    /// Whirlpool hold time in minutes.
    pub whirlpool: f64,
    /// Hop additions.
    pub hops: Vec<HopAddition>,
    /// Water added to the kettle in liters.
    pub water: f64,
    /// Sugar additions in kg.
    pub sugars: SugarAdditions,
    /// Wort reserved for priming (speise) in liters.
    pub speise: f64,
}

impl BoilParams {
    /// A boil of `minutes` without additions.
    pub fn new(minutes: f64) -> Self {
        Self {
            time: minutes,
            ..Self::default()
        }
    }

    /// Adds a hop addition.
    pub fn with_hop(mut self, hop: HopAddition) -> Self {
        self.hops.push(hop);
        self
    }

    /// Sets the whirlpool hold time.
    pub fn with_whirlpool(mut self, minutes: f64) -> Self {
        self.whirlpool = minutes;
        self
    }

    /// Sets the water addition.
    pub fn with_water(mut self, liters: f64) -> Self {
        self.water = liters;
        self
    }

    /// Sets one sugar addition in kg.
    pub fn with_sugar(mut self, sugar: Sugar, kilograms: f64) -> Self {
        self.sugars = self.sugars.with(sugar, kilograms);
        self
    }

    /// Reserves wort for priming.
    pub fn with_speise(mut self, liters: f64) -> Self {
        self.speise = liters;
        self
    }
}

/// Physical form of a yeast pitch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum YeastForm {
    /// Liquid culture.
    #[default]
    Liquid,
    /// Dried yeast.
    Dry,
    /// Harvested slurry.
    Slurry,
}

/// Yeast strain used for a fermentation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Yeast {
    /// Strain name.
    pub name: String,
    /// Physical form.
    pub form: YeastForm,
    /// Apparent attenuation in % (typically 70–85).
    pub attenuation: f64,
}

impl Default for Yeast {
    fn default() -> Self {
        Self {
            name: "WYeast London ESB".to_string(),
            form: YeastForm::Liquid,
            attenuation: 83.0,
        }
    }
}

/// Parameters of a fermentation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FermentParams {
    /// Primary fermentation temperature in °C.
    pub temperature: f64,
    /// Highest temperature reached in °C; dissolved CO2 is computed here.
    pub max_temperature: f64,
    /// Pitched yeast.
    pub yeast: Yeast,
    /// Water added to the fermenter in liters.
    pub water: f64,
    /// Sugar additions in kg.
    pub sugars: SugarAdditions,
}

impl FermentParams {
    /// A fermentation at `temperature` °C with a yeast of the given attenuation.
    pub fn new(temperature: f64, attenuation: f64) -> Self {
        Self {
            temperature,
            max_temperature: temperature,
            yeast: Yeast {
                attenuation,
                ..Yeast::default()
            },
            ..Self::default()
        }
    }

    /// Sets the maximum fermentation temperature.
    pub fn with_max_temperature(mut self, celsius: f64) -> Self {
        self.max_temperature = celsius;
        self
    }

    /// Sets the yeast strain.
    pub fn with_yeast(mut self, yeast: Yeast) -> Self {
        self.yeast = yeast;
        self
    }

    /// Sets the water addition.
    pub fn with_water(mut self, liters: f64) -> Self {
        self.water = liters;
        self
    }

    /// Sets one sugar addition in kg.
    pub fn with_sugar(mut self, sugar: Sugar, kilograms: f64) -> Self {
        self.sugars = self.sugars.with(sugar, kilograms);
        self
    }

    /// Temperature that determines residual CO2.
    pub fn carbonation_temperature(&self) -> f64 {
        self.temperature.max(self.max_temperature)
    }
}

/// Parameters of priming and bottling.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BottleParams {
    /// Priming sugars in g/L.
    pub priming: SugarAdditions,
    /// Speise added back for priming in liters.
    pub speise: f64,
}

impl BottleParams {
    /// Bottling without priming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one priming sugar in g/L.
    pub fn with_priming(mut self, sugar: Sugar, grams_per_liter: f64) -> Self {
        self.priming = self.priming.with(sugar, grams_per_liter);
        self
    }

    /// Sets the speise volume added back.
    pub fn with_speise(mut self, liters: f64) -> Self {
        self.speise = liters;
        self
    }
}

/// Cross-graph link of a split activity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitLink {
    /// Source side: moves `volume` liters to `target`.
    Outgoing {
        /// Receiving graph.
        target: GraphId,
        /// Transferred volume in liters.
        volume: f64,
    },
    /// Target side: start flow of this graph, fed by the split activity `source`.
    Incoming {
        /// The source graph's split activity (non-owning back-reference).
        source: NodeRef,
    },
}

/// Cross-graph link of a merge activity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergeLink {
    /// Source side: the flow leaves this graph for `target`.
    Outgoing {
        /// Receiving graph.
        target: GraphId,
    },
    /// Target side: the input is combined with the state node `source`.
    Incoming {
        /// State node of the other graph that is merged in.
        source: NodeRef,
    },
}

/// A brewing activity with its parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Activity {
    /// Mash and lauter.
    Mash(MashParams),
    /// Boil with hops.
    Boil(BoilParams),
    /// Ferment.
    Ferment(FermentParams),
    /// Prime and bottle.
    Bottle(BottleParams),
    /// Split part of the flow into another graph.
    Split(SplitLink),
    /// Merge a flow of another graph.
    Merge(MergeLink),
}

impl Activity {
    /// Returns the kind of this activity.
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Mash(_) => ActivityKind::Mash,
            Self::Boil(_) => ActivityKind::Boil,
            Self::Ferment(_) => ActivityKind::Ferment,
            Self::Bottle(_) => ActivityKind::Bottle,
            Self::Split(_) => ActivityKind::Split,
            Self::Merge(_) => ActivityKind::Merge,
        }
    }

    /// Returns `true` for split and merge activities.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Split(_) | Self::Merge(_))
    }

    /// The other graph this activity is linked to, if any.
    pub fn linked_graph(&self) -> Option<GraphId> {
        match self {
            Self::Split(SplitLink::Outgoing { target, .. })
            | Self::Merge(MergeLink::Outgoing { target }) => Some(*target),
            Self::Split(SplitLink::Incoming { source })
            | Self::Merge(MergeLink::Incoming { source }) => Some(source.graph),
            _ => None,
        }
    }

    /// Label of the state node this activity produces.
    pub fn output_label(&self) -> &'static str {
        match self {
            Self::Split(SplitLink::Incoming { .. }) => "Start flow",
            Self::Merge(MergeLink::Outgoing { .. }) => "Empty flow",
            other => other.kind().output_label(),
        }
    }
}

impl From<MashParams> for Activity {
    fn from(params: MashParams) -> Self {
        Self::Mash(params)
    }
}

impl From<BoilParams> for Activity {
    fn from(params: BoilParams) -> Self {
        Self::Boil(params)
    }
}

impl From<FermentParams> for Activity {
    fn from(params: FermentParams) -> Self {
        Self::Ferment(params)
    }
}

impl From<BottleParams> for Activity {
    fn from(params: BottleParams) -> Self {
        Self::Bottle(params)
    }
}

/// Parameter records of process activities, editable in place through
/// [`ProcessGraph::params_mut`](crate::ProcessGraph::params_mut).
///
/// Only the four process kinds implement this, so a link can never be
/// edited into an unpaired state.
pub trait ProcessParams: Sized {
    /// Kind of activity carrying these parameters.
    const KIND: ActivityKind;

    /// Borrows the parameters if `activity` is of this kind.
    fn from_activity_mut(activity: &mut Activity) -> Option<&mut Self>;
}

macro_rules! impl_process_params {
    ($($params:ty => $variant:ident),* $(,)?) => {
        $(
            impl ProcessParams for $params {
                const KIND: ActivityKind = ActivityKind::$variant;

                fn from_activity_mut(activity: &mut Activity) -> Option<&mut Self> {
                    match activity {
                        Activity::$variant(params) => Some(params),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_process_params!(
    MashParams => Mash,
    BoilParams => Boil,
    FermentParams => Ferment,
    BottleParams => Bottle,
);
