/// Everything that can be placed on a tile
///
/// `Fixture` is a closed enum with one variant per entity kind. `FixtureKind`
/// is its fieldless discriminant and is what the writer registry keys on.

use super::player::Player;
use super::terrain::{Forest, Ground, River};
use super::map::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

// ========================================
// Shared enums
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TownStatus {
    Active,
    Abandoned,
    Burned,
    Ruined,
}

impl TownStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TownStatus::Active => "active",
            TownStatus::Abandoned => "abandoned",
            TownStatus::Burned => "burned",
            TownStatus::Ruined => "ruined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(TownStatus::Active),
            "abandoned" => Some(TownStatus::Abandoned),
            "burned" => Some(TownStatus::Burned),
            "ruined" => Some(TownStatus::Ruined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TownSize {
    Small,
    Medium,
    Large,
}

impl TownSize {
    pub fn as_str(self) -> &'static str {
        match self {
            TownSize::Small => "small",
            TownSize::Medium => "medium",
            TownSize::Large => "large",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(TownSize::Small),
            "medium" => Some(TownSize::Medium),
            "large" => Some(TownSize::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Fallow,
    Seeding,
    Growing,
    Bearing,
}

impl FieldStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldStatus::Fallow => "fallow",
            FieldStatus::Seeding => "seeding",
            FieldStatus::Growing => "growing",
            FieldStatus::Bearing => "bearing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fallow" => Some(FieldStatus::Fallow),
            "seeding" => Some(FieldStatus::Seeding),
            "growing" => Some(FieldStatus::Growing),
            "bearing" => Some(FieldStatus::Bearing),
            _ => None,
        }
    }
}

/// Town-like settlements share a codec and differ only in their tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TownKind {
    Town,
    City,
    Fortification,
}

impl TownKind {
    pub fn tag(self) -> &'static str {
        match self {
            TownKind::Town => "town",
            TownKind::City => "city",
            TownKind::Fortification => "fortification",
        }
    }
}

/// Immortals and monsters. The last four carry a free-form `kind` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImmortalKind {
    Djinn,
    Griffin,
    Minotaur,
    Ogre,
    Phoenix,
    Simurgh,
    Sphinx,
    Troll,
    Centaur,
    Dragon,
    Fairy,
    Giant,
}

impl ImmortalKind {
    pub fn default_image(self) -> &'static str {
        match self {
            ImmortalKind::Djinn => "djinn.png",
            ImmortalKind::Griffin => "griffin.png",
            ImmortalKind::Minotaur => "minotaur.png",
            ImmortalKind::Ogre => "ogre.png",
            ImmortalKind::Phoenix => "phoenix.png",
            ImmortalKind::Simurgh => "simurgh.png",
            ImmortalKind::Sphinx => "sphinx.png",
            ImmortalKind::Troll => "troll.png",
            ImmortalKind::Centaur => "centaur.png",
            ImmortalKind::Dragon => "dragon.png",
            ImmortalKind::Fairy => "fairy.png",
            ImmortalKind::Giant => "giant.png",
        }
    }

    pub const ALL: [ImmortalKind; 12] = [
        ImmortalKind::Djinn,
        ImmortalKind::Griffin,
        ImmortalKind::Minotaur,
        ImmortalKind::Ogre,
        ImmortalKind::Phoenix,
        ImmortalKind::Simurgh,
        ImmortalKind::Sphinx,
        ImmortalKind::Troll,
        ImmortalKind::Centaur,
        ImmortalKind::Dragon,
        ImmortalKind::Fairy,
        ImmortalKind::Giant,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ImmortalKind::Djinn => "djinn",
            ImmortalKind::Griffin => "griffin",
            ImmortalKind::Minotaur => "minotaur",
            ImmortalKind::Ogre => "ogre",
            ImmortalKind::Phoenix => "phoenix",
            ImmortalKind::Simurgh => "simurgh",
            ImmortalKind::Sphinx => "sphinx",
            ImmortalKind::Troll => "troll",
            ImmortalKind::Centaur => "centaur",
            ImmortalKind::Dragon => "dragon",
            ImmortalKind::Fairy => "fairy",
            ImmortalKind::Giant => "giant",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let lower = tag.to_lowercase();
        Self::ALL.into_iter().find(|k| k.tag() == lower)
    }

    /// Whether this species takes a `kind` attribute
    pub fn is_kinded(self) -> bool {
        matches!(
            self,
            ImmortalKind::Centaur | ImmortalKind::Dragon | ImmortalKind::Fairy | ImmortalKind::Giant
        )
    }
}

// ========================================
// Fixture structs
// ========================================

/// Hill, oasis and sandbar carry nothing but an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTerrain {
    pub id: u32,
    pub image: String,
}

impl SimpleTerrain {
    pub fn new(id: u32) -> Self {
        Self { id, image: String::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: u32,
    pub kind: String,
    pub talking: bool,
    pub status: String,
    /// Turn of birth, -1 if unknown
    pub born: i32,
    pub image: String,
}

impl Animal {
    pub fn new(id: u32, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            talking: false,
            status: "wild".to_string(),
            born: -1,
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Immortal {
    pub id: u32,
    pub species: ImmortalKind,
    /// Empty unless `species.is_kinded()`
    pub kind: String,
    pub image: String,
}

impl Immortal {
    pub fn new(id: u32, species: ImmortalKind) -> Self {
        Self {
            id,
            species,
            kind: String::new(),
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grove {
    pub id: u32,
    pub kind: String,
    pub cultivated: bool,
    /// Written as `<orchard>` rather than `<grove>`
    pub orchard: bool,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meadow {
    pub id: u32,
    pub kind: String,
    pub cultivated: bool,
    pub status: FieldStatus,
    /// Written as `<field>` rather than `<meadow>`
    pub field: bool,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mine {
    pub id: u32,
    pub kind: String,
    pub status: TownStatus,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mineral {
    pub id: u32,
    pub kind: String,
    pub exposed: bool,
    pub dc: i32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    pub id: u32,
    pub kind: String,
    pub dc: i32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shrub {
    pub id: u32,
    pub kind: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheFixture {
    pub id: u32,
    pub kind: String,
    pub contents: String,
    pub image: String,
}

/// A unit member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: u32,
    pub name: String,
    pub race: String,
    pub image: String,
}

impl Worker {
    pub const DEFAULT_IMAGE: &'static str = "worker.png";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: u32,
    pub owner: Player,
    pub kind: String,
    pub name: String,
    /// Free text inside the element
    pub orders: String,
    pub members: Vec<Worker>,
    pub image: String,
}

impl Unit {
    pub fn new(id: u32, owner: Player, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            kind: kind.into(),
            name: name.into(),
            orders: String::new(),
            members: Vec::new(),
            image: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fortress {
    pub id: u32,
    pub owner: Player,
    pub name: String,
    pub size: TownSize,
    pub units: Vec<Unit>,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Town {
    pub id: u32,
    pub kind: TownKind,
    pub status: TownStatus,
    pub size: TownSize,
    pub dc: i32,
    pub name: String,
    pub owner: Player,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    pub id: u32,
    pub status: TownStatus,
    pub name: String,
    pub race: String,
    pub owner: Player,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cave {
    pub id: u32,
    pub dc: i32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    pub id: u32,
    pub dc: i32,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub id: u32,
    pub destination_world: String,
    /// (-1, -1) when the far end is unknown
    pub destination: Point,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adventure {
    pub id: u32,
    pub brief: String,
    pub full: String,
    pub owner: Player,
    pub image: String,
}

/// A free-text note on a tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFixture {
    pub text: String,
    /// Turn the note refers to, -1 if none
    pub turn: i32,
    pub image: String,
}

impl TextFixture {
    pub fn new(text: impl Into<String>, turn: i32) -> Self {
        Self {
            text: text.into(),
            turn,
            image: String::new(),
        }
    }
}

// ========================================
// Fixture enum
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fixture {
    Mountain,
    River(River),
    Ground(Ground),
    Forest(Forest),
    Hill(SimpleTerrain),
    Oasis(SimpleTerrain),
    Sandbar(SimpleTerrain),
    Animal(Animal),
    Immortal(Immortal),
    Grove(Grove),
    Meadow(Meadow),
    Mine(Mine),
    Mineral(Mineral),
    Stone(Stone),
    Shrub(Shrub),
    Cache(CacheFixture),
    Unit(Unit),
    Fortress(Fortress),
    Town(Town),
    Village(Village),
    Cave(Cave),
    Battlefield(Battlefield),
    Portal(Portal),
    Adventure(Adventure),
    Text(TextFixture),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FixtureKind {
    Mountain,
    River,
    Ground,
    Forest,
    Hill,
    Oasis,
    Sandbar,
    Animal,
    Immortal,
    Grove,
    Meadow,
    Mine,
    Mineral,
    Stone,
    Shrub,
    Cache,
    Unit,
    Fortress,
    Town,
    Village,
    Cave,
    Battlefield,
    Portal,
    Adventure,
    Text,
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Fixture {
    pub fn kind(&self) -> FixtureKind {
        match self {
            Fixture::Mountain => FixtureKind::Mountain,
            Fixture::River(_) => FixtureKind::River,
            Fixture::Ground(_) => FixtureKind::Ground,
            Fixture::Forest(_) => FixtureKind::Forest,
            Fixture::Hill(_) => FixtureKind::Hill,
            Fixture::Oasis(_) => FixtureKind::Oasis,
            Fixture::Sandbar(_) => FixtureKind::Sandbar,
            Fixture::Animal(_) => FixtureKind::Animal,
            Fixture::Immortal(_) => FixtureKind::Immortal,
            Fixture::Grove(_) => FixtureKind::Grove,
            Fixture::Meadow(_) => FixtureKind::Meadow,
            Fixture::Mine(_) => FixtureKind::Mine,
            Fixture::Mineral(_) => FixtureKind::Mineral,
            Fixture::Stone(_) => FixtureKind::Stone,
            Fixture::Shrub(_) => FixtureKind::Shrub,
            Fixture::Cache(_) => FixtureKind::Cache,
            Fixture::Unit(_) => FixtureKind::Unit,
            Fixture::Fortress(_) => FixtureKind::Fortress,
            Fixture::Town(_) => FixtureKind::Town,
            Fixture::Village(_) => FixtureKind::Village,
            Fixture::Cave(_) => FixtureKind::Cave,
            Fixture::Battlefield(_) => FixtureKind::Battlefield,
            Fixture::Portal(_) => FixtureKind::Portal,
            Fixture::Adventure(_) => FixtureKind::Adventure,
            Fixture::Text(_) => FixtureKind::Text,
        }
    }

    /// Entity id; `None` for kinds that have none
    pub fn id(&self) -> Option<u32> {
        match self {
            Fixture::Mountain | Fixture::River(_) | Fixture::Text(_) => None,
            Fixture::Ground(g) => Some(g.id),
            Fixture::Forest(f) => Some(f.id),
            Fixture::Hill(s) | Fixture::Oasis(s) | Fixture::Sandbar(s) => Some(s.id),
            Fixture::Animal(a) => Some(a.id),
            Fixture::Immortal(i) => Some(i.id),
            Fixture::Grove(g) => Some(g.id),
            Fixture::Meadow(m) => Some(m.id),
            Fixture::Mine(m) => Some(m.id),
            Fixture::Mineral(m) => Some(m.id),
            Fixture::Stone(s) => Some(s.id),
            Fixture::Shrub(s) => Some(s.id),
            Fixture::Cache(c) => Some(c.id),
            Fixture::Unit(u) => Some(u.id),
            Fixture::Fortress(f) => Some(f.id),
            Fixture::Town(t) => Some(t.id),
            Fixture::Village(v) => Some(v.id),
            Fixture::Cave(c) => Some(c.id),
            Fixture::Battlefield(b) => Some(b.id),
            Fixture::Portal(p) => Some(p.id),
            Fixture::Adventure(a) => Some(a.id),
        }
    }

    /// Per-instance icon override; empty means "use the default"
    pub fn image(&self) -> &str {
        match self {
            Fixture::Mountain | Fixture::River(_) => "",
            Fixture::Ground(g) => &g.image,
            Fixture::Forest(f) => &f.image,
            Fixture::Hill(s) | Fixture::Oasis(s) | Fixture::Sandbar(s) => &s.image,
            Fixture::Animal(a) => &a.image,
            Fixture::Immortal(i) => &i.image,
            Fixture::Grove(g) => &g.image,
            Fixture::Meadow(m) => &m.image,
            Fixture::Mine(m) => &m.image,
            Fixture::Mineral(m) => &m.image,
            Fixture::Stone(s) => &s.image,
            Fixture::Shrub(s) => &s.image,
            Fixture::Cache(c) => &c.image,
            Fixture::Unit(u) => &u.image,
            Fixture::Fortress(f) => &f.image,
            Fixture::Town(t) => &t.image,
            Fixture::Village(v) => &v.image,
            Fixture::Cave(c) => &c.image,
            Fixture::Battlefield(b) => &b.image,
            Fixture::Portal(p) => &p.image,
            Fixture::Adventure(a) => &a.image,
            Fixture::Text(t) => &t.image,
        }
    }

    /// Icon a fixture of this kind gets when it has no override
    pub fn default_image(&self) -> &'static str {
        match self {
            Fixture::Immortal(i) => i.species.default_image(),
            other => other.kind().default_image(),
        }
    }
}

impl FixtureKind {
    /// Icon used when a fixture carries no `image` of its own
    ///
    /// Immortals pick theirs by species; see `ImmortalKind::default_image`.
    pub fn default_image(self) -> &'static str {
        match self {
            FixtureKind::Mountain => "mountain.png",
            FixtureKind::River => "river.png",
            FixtureKind::Ground => "ground.png",
            FixtureKind::Forest => "trees.png",
            FixtureKind::Hill => "hill.png",
            FixtureKind::Oasis => "oasis.png",
            FixtureKind::Sandbar => "sandbar.png",
            FixtureKind::Animal => "animal.png",
            FixtureKind::Immortal => "immortal.png",
            FixtureKind::Grove => "tree.png",
            FixtureKind::Meadow => "meadow.png",
            FixtureKind::Mine => "mine.png",
            FixtureKind::Mineral => "mineral.png",
            FixtureKind::Stone => "stone.png",
            FixtureKind::Shrub => "shrub.png",
            FixtureKind::Cache => "cache.png",
            FixtureKind::Unit => "unit.png",
            FixtureKind::Fortress => "fortress.png",
            FixtureKind::Town => "town.png",
            FixtureKind::Village => "village.png",
            FixtureKind::Cave => "cave.png",
            FixtureKind::Battlefield => "battlefield.png",
            FixtureKind::Portal => "portal.png",
            FixtureKind::Adventure => "adventure.png",
            FixtureKind::Text => "text.png",
        }
    }
}
