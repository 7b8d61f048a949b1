/// Roster entries
///
/// Players are not fixtures: the map reader calls these directly rather
/// than going through the dispatch tables.

use crate::error::Result;
use crate::io::helpers::{get_attr_with_deprecated, get_int_attribute, spin_until_end};
use crate::io::node::Node;
use crate::io::token::{StartTag, TokenStream};
use crate::model::Player;
use crate::warning::Warning;

pub fn read_player(tag: &StartTag, stream: &mut dyn TokenStream, warner: &dyn Warning) -> Result<Player> {
    let number = get_int_attribute(tag, "number")?;
    let name = get_attr_with_deprecated(tag, "code_name", "name", warner)?;
    spin_until_end(tag, stream)?;
    Ok(Player::new(number, name))
}

pub fn write_player(player: &Player) -> Node {
    Node::new("player")
        .attribute("number", player.number)
        .attribute("code_name", &player.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use crate::io::token::{Token, XmlTokenSource};
    use crate::warning::CollectWarnings;

    fn read(xml: &str, warner: &dyn Warning) -> Result<Player> {
        let mut stream = XmlTokenSource::from_text(xml, "players.xml");
        let Some(Token::Start(tag)) = stream.next_token()? else {
            panic!("Expected a start tag");
        };
        read_player(&tag, &mut stream, warner)
    }

    #[test]
    fn test_read_player() {
        let warner = CollectWarnings::new();
        let player = read(r#"<player number="1" code_name="Alice"/>"#, &warner).unwrap();

        assert_eq!(player, Player::new(1, "Alice"));
        assert!(warner.is_empty());
    }

    #[test]
    fn test_read_player_deprecated_name() {
        let warner = CollectWarnings::new();
        let player = read(r#"<player number="2" name="Bram"/>"#, &warner).unwrap();

        assert_eq!(player.name, "Bram");
        assert_eq!(warner.count(), 1);
    }

    #[test]
    fn test_read_player_requires_number() {
        let warner = CollectWarnings::new();
        let result = read(r#"<player code_name="Nobody"/>"#, &warner);
        assert!(matches!(result, Err(MapError::MissingParameter { ref param, .. }) if param == "number"));
    }

    #[test]
    fn test_write_player() {
        let node = write_player(&Player::new(3, "Cyd"));
        assert_eq!(node.get_attribute("number"), Some("3"));
        assert_eq!(node.get_attribute("code_name"), Some("Cyd"));
    }
}
