use std::io::{self, Write};

use shared::view::ProductCard;

pub fn render_listing(out: &mut impl Write, cards: &[ProductCard]) -> io::Result<()> {
    if cards.is_empty() {
        writeln!(out, "(no products)")?;
        return Ok(());
    }

    for card in cards {
        writeln!(out, "{}", card.title)?;
        writeln!(out, "  Price: ${}", card.price)?;
        writeln!(out, "  {}", card.description)?;
        match &card.primary_image {
            Some(url) => writeln!(out, "  Image: {url}")?,
            None => writeln!(out, "  Image: none")?,
        }
    }
    writeln!(out, "-- {} products", cards.len())
}
