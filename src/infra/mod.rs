pub mod scryfall;
