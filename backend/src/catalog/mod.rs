//! Influencer catalog - the read-only data source for browsing and filtering.
//!
//! The catalog is built once per process and never mutated.

use once_cell::sync::Lazy;

use crate::models::Influencer;

/// Built-in catalog shared by the CLI and the HTTP server.
pub static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// An immutable list of influencers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    influencers: Vec<Influencer>,
}

impl Catalog {
    pub fn new(influencers: Vec<Influencer>) -> Self {
        Self { influencers }
    }

    /// The bundled sample catalog.
    pub fn builtin() -> Self {
        let entries = [
            (
                "1",
                "John Doe",
                "https://images.unsplash.com/photo-1619300026534-8e8a76941138",
                "Fashion | Lifestyle",
                "From R2000",
                30_000,
                "Cape Town",
            ),
            (
                "2",
                "Sara Jane",
                "https://images.unsplash.com/photo-1553544923-37efbe6ff816",
                "Beauty | UGC",
                "From R1500",
                50_000,
                "Johannesburg",
            ),
            (
                "3",
                "Mike Star",
                "https://images.unsplash.com/photo-1485463598028-44d6c47bf23f",
                "Film | Content Creation",
                "From R500",
                12_000,
                "Durban",
            ),
            (
                "4",
                "Tina Bell",
                "https://images.unsplash.com/photo-1612928414075-bc722ade44f1",
                "Travel | Makeup",
                "From R3000",
                90_000,
                "Cape Town",
            ),
            (
                "5",
                "Lara Moon",
                "https://images.unsplash.com/photo-1589156191108-c762ff4b96ab",
                "Fashion | Lifestyle",
                "From R1800",
                40_000,
                "Pretoria",
            ),
            (
                "6",
                "Jess Ray",
                "https://images.unsplash.com/photo-1570158268183-d296b2892211",
                "Beauty | UGC",
                "From R1500",
                25_000,
                "Bloemfontein",
            ),
        ];

        let influencers = entries
            .into_iter()
            .map(|(id, name, image, category, rate, audience, location)| Influencer {
                id: id.to_string(),
                name: name.to_string(),
                image: image.to_string(),
                category: category.to_string(),
                rate: rate.to_string(),
                audience,
                location: location.to_string(),
            })
            .collect();

        Self { influencers }
    }

    pub fn all(&self) -> &[Influencer] {
        &self.influencers
    }

    pub fn get(&self, id: &str) -> Option<&Influencer> {
        self.influencers.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.influencers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.influencers.is_empty()
    }
}
