use shared::domain::{TeamMember, TeamMemberId, User, UserId};

/// Sample records the application starts with.
pub fn seed_users() -> Vec<User> {
    let mut john = User::new(UserId(1), "John Doe", "john@example.com");
    john.position = Some("Software Engineer".into());
    john.avatar = Some("/images/avatars/john.png".into());
    john.followers = Some(128);
    john.following = Some(64);
    john.team = vec![
        TeamMember {
            id: TeamMemberId(1),
            name: "Sarah Connor".into(),
            avatar: "/images/avatars/sarah.png".into(),
        },
        TeamMember {
            id: TeamMemberId(2),
            name: "Kyle Reese".into(),
            avatar: "/images/avatars/kyle.png".into(),
        },
    ];

    vec![
        john,
        User::new(UserId(2), "Jane Smith", "jane@example.com"),
        User::new(UserId(3), "Mike Johnson", "mike@example.com"),
    ]
}
