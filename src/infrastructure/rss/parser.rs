use ::rss::{Channel, Item};

use crate::domain::news::{Feed, RawItem};

/// Decode an RSS 2.0 document.
///
/// Namespaced elements (`atom:link`, `media:title`, `dc:creator`, ...) are
/// kept apart from the core fields, so they never shadow `link` or `title`.
pub fn parse_feed(body: &[u8]) -> Result<Feed, ::rss::Error> {
    let channel = Channel::read_from(body)?;
    Ok(feed_from_channel(&channel))
}

fn feed_from_channel(channel: &Channel) -> Feed {
    Feed {
        title: channel.title().to_string(),
        link: channel.link().to_string(),
        description: channel.description().to_string(),
        items: channel.items().iter().map(raw_item).collect(),
    }
}

fn raw_item(item: &Item) -> RawItem {
    RawItem {
        title: item.title().unwrap_or_default().to_string(),
        link: item.link().unwrap_or_default().to_string(),
        description: item.description().unwrap_or_default().to_string(),
        pub_date: item.pub_date().unwrap_or_default().to_string(),
        categories: item
            .categories()
            .iter()
            .map(|category| category.name().to_string())
            .collect(),
    }
}
