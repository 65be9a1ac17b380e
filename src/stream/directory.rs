use crate::model::Channel;
use lazy_static::lazy_static;

lazy_static! {
    static ref CHANNELS: Vec<Channel> = vec![
        Channel {
            id: "cyber-radio-1".to_string(),
            name: "CYBER RADIO ONE".to_string(),
            description: "Electronic · Synthwave · Cyberpunk".to_string(),
            is_live: true,
            stream_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3".to_string(),
            thumbnail_url: "https://images.unsplash.com/photo-1518837695005-2083093ee35b?w=400&h=400&fit=crop".to_string(),
            current_listeners: 2847,
            category: "Electronic".to_string(),
            created_by: "CYBER_DJ".to_string(),
        },
        Channel {
            id: "neon-beats".to_string(),
            name: "NEON BEATS".to_string(),
            description: "House · Techno · Future Bass".to_string(),
            is_live: true,
            stream_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3".to_string(),
            thumbnail_url: "https://images.unsplash.com/photo-1571330735066-03aaa9429d89?w=400&h=400&fit=crop".to_string(),
            current_listeners: 1523,
            category: "House".to_string(),
            created_by: "NEON_MASTER".to_string(),
        },
        Channel {
            id: "future-lounge".to_string(),
            name: "FUTURE LOUNGE".to_string(),
            description: "Chillwave · Ambient · Lo-fi".to_string(),
            is_live: false,
            stream_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3".to_string(),
            thumbnail_url: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=400&h=400&fit=crop".to_string(),
            current_listeners: 892,
            category: "Ambient".to_string(),
            created_by: "CHILL_VIBES".to_string(),
        },
    ];
}

pub fn channels() -> &'static [Channel] {
    &CHANNELS
}

pub fn find_channel(id: &str) -> Option<Channel> {
    CHANNELS.iter().find(|c| c.id.eq_ignore_ascii_case(id)).cloned()
}
