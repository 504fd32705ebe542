//! Closed vocabularies shared by every identification path.

use std::sync::LazyLock;

use regex::Regex;

/// Ships that can be rewarded by a research project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ship {
	Neptune,
	Monarch,
	Ibuki,
	Izumo,
	Roon,
	SaintLouis,
	Seattle,
	Georgia,
	Kitakaze,
	Azuma,
	Friedrich,
	Gascogne,
	Champagne,
	Cheshire,
	Drake,
	Mainz,
	Odin,
}

impl Ship {
	pub const ALL: [Ship; 17] = [
		Ship::Neptune,
		Ship::Monarch,
		Ship::Ibuki,
		Ship::Izumo,
		Ship::Roon,
		Ship::SaintLouis,
		Ship::Seattle,
		Ship::Georgia,
		Ship::Kitakaze,
		Ship::Azuma,
		Ship::Friedrich,
		Ship::Gascogne,
		Ship::Champagne,
		Ship::Cheshire,
		Ship::Drake,
		Ship::Mainz,
		Ship::Odin,
	];

	/// Ships of the higher rarity tier ("DR").
	pub const HIGH_TIER: [Ship; 3] = [Ship::Azuma, Ship::Friedrich, Ship::Drake];

	pub fn as_str(&self) -> &'static str {
		match self {
			Ship::Neptune => "neptune",
			Ship::Monarch => "monarch",
			Ship::Ibuki => "ibuki",
			Ship::Izumo => "izumo",
			Ship::Roon => "roon",
			Ship::SaintLouis => "saintlouis",
			Ship::Seattle => "seattle",
			Ship::Georgia => "georgia",
			Ship::Kitakaze => "kitakaze",
			Ship::Azuma => "azuma",
			Ship::Friedrich => "friedrich",
			Ship::Gascogne => "gascogne",
			Ship::Champagne => "champagne",
			Ship::Cheshire => "cheshire",
			Ship::Drake => "drake",
			Ship::Mainz => "mainz",
			Ship::Odin => "odin",
		}
	}

	pub fn rarity(&self) -> ShipRarity {
		if Self::HIGH_TIER.contains(self) {
			ShipRarity::Dr
		} else {
			ShipRarity::Pry
		}
	}

	/// Exact lookup of a label such as `"Saint Louis"` or `"drake"`.
	pub fn from_label(label: &str) -> Option<Self> {
		let label = normalize_label(label);
		Self::ALL.into_iter().find(|ship| ship.as_str() == label)
	}

	/// First ship mentioned anywhere in a label, e.g. `"Drake Blueprint"`.
	pub fn search(label: &str) -> Option<Self> {
		static RE: LazyLock<Regex> = LazyLock::new(|| {
			let names = Ship::ALL.map(|ship| ship.as_str()).join("|");
			Regex::new(&format!("({names})")).expect("ship regex")
		});

		RE.find(&normalize_label(label))
			.and_then(|m| Self::from_label(m.as_str()))
	}
}

impl std::fmt::Display for Ship {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipRarity {
	/// High tier.
	Dr,
	/// Standard tier.
	Pry,
}

impl ShipRarity {
	pub fn as_str(&self) -> &'static str {
		match self {
			ShipRarity::Dr => "dr",
			ShipRarity::Pry => "pry",
		}
	}
}

/// Resources a project may consume that the operator can opt out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
	Coin,
	Cube,
	Part,
}

impl Resource {
	pub const ALL: [Resource; 3] = [Resource::Coin, Resource::Cube, Resource::Part];

	pub fn as_str(&self) -> &'static str {
		match self {
			Resource::Coin => "coin",
			Resource::Cube => "cube",
			Resource::Part => "part",
		}
	}

	/// First resource mentioned anywhere in a label, e.g. `"General Part T2"` is a part.
	pub fn search(label: &str) -> Option<Self> {
		static RE: LazyLock<Regex> = LazyLock::new(|| {
			let names = Resource::ALL.map(|res| res.as_str()).join("|");
			Regex::new(&format!("({names})")).expect("resource regex")
		});

		let label = normalize_label(label);
		let found = RE.find(&label)?;
		Self::ALL.into_iter().find(|res| res.as_str() == found.as_str())
	}
}

/// Strip all whitespace and lowercase.
pub fn normalize_label(label: &str) -> String {
	label
		.chars()
		.filter(|c| !c.is_whitespace())
		.flat_map(char::to_lowercase)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn labels_are_normalized() {
		assert_eq!(normalize_label(" Saint Louis "), "saintlouis");
		assert_eq!(Ship::from_label("Saint Louis"), Some(Ship::SaintLouis));
		assert_eq!(Ship::from_label("Enterprise"), None);
	}

	#[test]
	fn ships_are_found_inside_longer_labels() {
		assert_eq!(Ship::search("Drake Blueprint"), Some(Ship::Drake));
		assert_eq!(Ship::search("Wisdom Cube"), None);
	}

	#[test]
	fn rarity_uses_the_high_tier_set() {
		for ship in Ship::ALL {
			let expected = if matches!(ship, Ship::Azuma | Ship::Friedrich | Ship::Drake) {
				ShipRarity::Dr
			} else {
				ShipRarity::Pry
			};
			assert_eq!(ship.rarity(), expected, "{ship}");
		}
	}

	#[test]
	fn resources_match_any_case_and_spacing() {
		assert_eq!(Resource::search("Cube"), Some(Resource::Cube));
		assert_eq!(Resource::search(" c U b e "), Some(Resource::Cube));
		assert_eq!(Resource::search("Coins"), Some(Resource::Coin));
		assert_eq!(Resource::search("General Part T2"), Some(Resource::Part));
		assert_eq!(Resource::search("Oil"), None);
	}
}
