use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_IMAGE_DIMENSION, MIN_IMAGE_DIMENSION};
use crate::error::ServiceError;

/// The closed set of animal categories the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animal {
    Cat,
    Dog,
    Bear,
}

impl Animal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Animal::Cat => "cat",
            Animal::Dog => "dog",
            Animal::Bear => "bear",
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Animal {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cat" => Ok(Animal::Cat),
            "dog" => Ok(Animal::Dog),
            "bear" => Ok(Animal::Bear),
            other => Err(ServiceError::UnsupportedAnimal(other.to_string())),
        }
    }
}

/// Build a randomized placeholder URL for the given animal
/// Width and height are drawn independently; calls are not reproducible
pub fn image_source_url(animal: Animal) -> String {
    let mut rng = rand::thread_rng();
    let width = rng.gen_range(MIN_IMAGE_DIMENSION..=MAX_IMAGE_DIMENSION);
    let height = rng.gen_range(MIN_IMAGE_DIMENSION..=MAX_IMAGE_DIMENSION);
    match animal {
        Animal::Cat => format!("https://placekitten.com/{}/{}", width, height),
        Animal::Dog => format!("https://place.dog/{}/{}", width, height),
        Animal::Bear => format!("https://placebear.com/{}/{}", width, height),
    }
}
