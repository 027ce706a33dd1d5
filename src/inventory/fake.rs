use rand::Rng;
use rand::seq::SliceRandom;

const CATALOGUE: [(&str, [&str; 5]); 5] = [
    ("Electronics", ["Phone", "Laptop", "Tablet", "Smartwatch", "Headphones"]),
    ("Clothing", ["Shirt", "Pants", "Dress", "Shoes", "Hat"]),
    ("Books", ["Fiction", "Non-Fiction", "Mystery", "Thriller", "Romance"]),
    ("Toys", ["Action Figure", "Doll", "Board Game", "Puzzle", "Remote Control Car"]),
    ("Furniture", ["Chair", "Table", "Desk", "Bed", "Sofa"]),
];

/// Exclusive upper bound of generated prices.
pub const MAX_PRICE: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct FakeItem {
    pub name: String,
    pub category: String,
    pub price: f64,
}

pub fn categories() -> impl Iterator<Item = &'static str> {
    CATALOGUE.iter().map(|(category, _)| *category)
}

pub fn fake_item<R: Rng + ?Sized>(rng: &mut R) -> FakeItem {
    let (category, names) = CATALOGUE[rng.gen_range(0..CATALOGUE.len())];
    let name = names.choose(rng).copied().unwrap_or(category);
    FakeItem {
        name: format!("Fake {name}"),
        category: category.to_string(),
        price: f64::from(rng.gen_range(0..MAX_PRICE)),
    }
}
