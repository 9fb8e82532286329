mod common;

use std::time::Duration;

use daap::dmap::{DecodeKind, DmapEncoder, Tag, Value};
use daap::{
    ClientConfig, DaapClient, DaapError, ItemsQuery, Request, RequestError, RequestErrorKind, Status,
};

use common::{
    client, content_codes_body, databases_body, logged_in, login_body, playlists_body, server_info_body,
    songs_body, update_body, ScriptedServer,
};

#[test]
fn login_reads_session_then_updates() {
    let mut client = client(ScriptedServer::with_session(42, 7));
    assert_eq!(client.status(), Status::Disconnected);

    client.login(None).unwrap();

    assert_eq!(client.session_id(), Some(42));
    assert_eq!(client.revision_id(), Some(7));
    assert_eq!(client.status(), Status::HasRevision);
    assert_eq!(client.transport().paths(), vec!["login", "update"]);
    assert_eq!(
        client.transport().requests[1].url,
        "http://127.0.0.1:3689/update?session-id=42"
    );
}

#[test]
fn login_accepts_a_bare_session_id_frame() {
    let mut e = DmapEncoder::new();
    e.u32("mlid", 42);
    let server = ScriptedServer::new()
        .route("login", e.flush())
        .route("update", update_body(1));
    let mut client = client(server);
    client.login(None).unwrap();
    assert_eq!(client.session_id(), Some(42));
    assert_eq!(client.status(), Status::HasRevision);
}

#[test]
fn second_login_is_an_invalid_state() {
    let mut client = logged_in(ScriptedServer::with_session(42, 7));
    let err = client.login(None).unwrap_err();
    assert_eq!(
        err,
        DaapError::InvalidState {
            status: Status::HasRevision,
            operation: "login",
        }
    );
    // the rejected call neither requests nor changes state
    assert_eq!(client.transport().requests.len(), 2);
    assert_eq!(client.status(), Status::HasRevision);
}

#[test]
fn rejected_login_keeps_the_password() {
    let mut client = client(ScriptedServer::with_session(42, 7));
    client.login(Some("first")).unwrap();

    let err = client.login(Some("second")).unwrap_err();
    assert!(matches!(err, DaapError::InvalidState { operation: "login", .. }));
    assert_eq!(client.config().password.as_deref(), Some("first"));

    client.transport_mut().reroute("update", update_body(8));
    client.update().unwrap();
    // base64("admin:first")
    assert_eq!(
        client.transport().requests[2].header("Authorization"),
        Some("Basic YWRtaW46Zmlyc3Q=")
    );
}

#[test]
fn logout_when_disconnected_makes_no_request() {
    let mut client = client(ScriptedServer::new());
    client.logout().unwrap();
    assert_eq!(client.status(), Status::Disconnected);
    assert!(client.transport().requests.is_empty());
}

#[test]
fn logout_ignores_the_body_and_clears_ids() {
    let server = ScriptedServer::with_session(42, 7).route("logout", b"not dmap".to_vec());
    let mut client = logged_in(server);
    client.logout().unwrap();
    assert_eq!(client.status(), Status::Disconnected);
    assert_eq!(client.session_id(), None);
    assert_eq!(client.revision_id(), None);
    assert_eq!(client.transport().last_url(), "http://127.0.0.1:3689/logout?session-id=42");

    // a fresh login is allowed again
    client.login(None).unwrap();
    assert_eq!(client.status(), Status::HasRevision);
}

#[test]
fn update_refreshes_the_revision() {
    let mut client = logged_in(ScriptedServer::with_session(42, 7));
    client.transport_mut().reroute("update", update_body(8));
    client.update().unwrap();
    assert_eq!(client.revision_id(), Some(8));
    assert_eq!(client.status(), Status::HasRevision);
}

#[test]
fn update_needs_a_session() {
    let mut client = client(ScriptedServer::new());
    let err = client.update().unwrap_err();
    assert!(matches!(err, DaapError::InvalidState { operation: "update", .. }));
}

#[test]
fn listings_need_a_revision() {
    let mut client = client(ScriptedServer::new());
    assert!(matches!(
        client.databases().unwrap_err(),
        DaapError::InvalidState { status: Status::Disconnected, operation: "databases" }
    ));
    assert!(matches!(
        client.playlists(1).unwrap_err(),
        DaapError::InvalidState { operation: "playlists", .. }
    ));
    assert!(matches!(
        client.items(&ItemsQuery::default()).unwrap_err(),
        DaapError::InvalidState { operation: "items", .. }
    ));
    assert!(client.transport().requests.is_empty());
}

#[test]
fn failed_login_request_forces_error_and_allows_retry() {
    let server = ScriptedServer::new().fail("login", RequestErrorKind::Timeout);
    let mut client = client(server);

    let err = client.login(None).unwrap_err();
    assert!(matches!(
        err,
        DaapError::Request(RequestError { kind: RequestErrorKind::Timeout, .. })
    ));
    assert_eq!(client.status(), Status::Error);

    client.transport_mut().reroute("login", login_body(5));
    client.transport_mut().reroute("update", update_body(1));
    client.login(None).unwrap();
    assert_eq!(client.session_id(), Some(5));
}

#[test]
fn failed_update_after_login_leaves_error() {
    let server = ScriptedServer::new()
        .route("login", login_body(42))
        .fail("update", RequestErrorKind::Status(503));
    let mut client = client(server);
    assert!(client.login(None).is_err());
    assert_eq!(client.status(), Status::Error);
    assert_eq!(client.session_id(), Some(42));
}

#[test]
fn undecodable_response_is_a_decode_error() {
    let server = ScriptedServer::new().route("login", Vec::new());
    let mut client = client(server);
    let err = client.login(None).unwrap_err();
    assert!(matches!(err, DaapError::Decode { ref url, .. } if url.ends_with("/login")));
    assert_eq!(client.status(), Status::Error);
}

#[test]
fn login_without_session_id_is_a_decode_error() {
    let mut e = DmapEncoder::new();
    e.container("mlog", |e| e.i32("mstt", 200));
    let mut client = client(ScriptedServer::new().route("login", e.flush()));
    let err = client.login(None).unwrap_err();
    assert!(matches!(err, DaapError::Decode { ref reason, .. } if reason.contains("mlid")));
    assert_eq!(client.status(), Status::Error);

    // nothing to close, so logout just resets
    client.logout().unwrap();
    assert_eq!(client.status(), Status::Disconnected);
    assert_eq!(client.transport().paths(), vec!["login"]);
}

#[test]
fn failed_listing_request_forces_error() {
    let mut client = logged_in(ScriptedServer::with_session(42, 7));
    let err = client.databases().unwrap_err();
    assert!(matches!(
        err,
        DaapError::Request(RequestError { kind: RequestErrorKind::Status(404), .. })
    ));
    assert_eq!(client.status(), Status::Error);
}

#[test]
fn requests_carry_accept_and_basic_auth() {
    let config = ClientConfig {
        server: "jukebox.local".into(),
        port: 3690,
        timeout_ms: 2500,
        ..ClientConfig::default()
    };
    let mut client = DaapClient::new(config, ScriptedServer::with_session(1, 1));
    client.login(Some("secret")).unwrap();

    let request = &client.transport().requests[0];
    assert_eq!(request.url, "http://jukebox.local:3690/login");
    assert_eq!(request.header("accept"), Some("application/x-dmap-tagged"));
    assert_eq!(request.header("Authorization"), Some("Basic YWRtaW46c2VjcmV0"));
    assert_eq!(request.timeout, Duration::from_millis(2500));
}

#[test]
fn no_authorization_without_password() {
    let client = logged_in(ScriptedServer::with_session(1, 1));
    assert!(client
        .transport()
        .requests
        .iter()
        .all(|r| r.header("Authorization").is_none()));
}

#[test]
fn set_server_rebuilds_the_base_url() {
    let mut client = client(ScriptedServer::new());
    client.set_server(Some("10.0.0.2"), Some(3700));
    assert_eq!(client.base_url(), "http://10.0.0.2:3700/");
    client.set_server(None, None);
    assert_eq!(client.base_url(), "http://127.0.0.1:3689/");
}

#[test]
fn databases_listing() {
    let server = ScriptedServer::with_session(42, 7).route("databases", databases_body());
    let mut client = logged_in(server);

    let databases = client.databases().unwrap();
    assert_eq!(
        client.transport().last_url(),
        "http://127.0.0.1:3689/databases?session-id=42&revision-id=7"
    );
    assert_eq!(databases.len(), Some(1));
    assert!(!databases.is_empty());

    let mut all = databases.cursor().get(None);
    assert_eq!(all.len(), 1);
    let db = &mut all[0];
    assert_eq!(db.id().unwrap(), Some(1));
    assert_eq!(db.name().unwrap().as_deref(), Some("Living Room"));
    assert_eq!(db.item_count().unwrap(), Some(5));
    assert_eq!(db.playlist_count().unwrap(), Some(2));
}

#[test]
fn playlists_listing_and_flags() {
    let server = ScriptedServer::with_session(42, 7).route("databases/3/containers", playlists_body());
    let mut client = logged_in(server);

    let playlists = client.playlists(3).unwrap();
    let url = client.transport().last_url();
    assert!(url.starts_with("http://127.0.0.1:3689/databases/3/containers?session-id=42&revision-id=7&meta="));
    assert!(url.ends_with("com.apple.itunes.special-playlist,com.apple.itunes.smart-playlist"));

    let mut lists: Vec<_> = playlists.cursor().collect();
    assert_eq!(lists.len(), 2);

    let library = &mut lists[0];
    assert!(library.is_base().unwrap());
    assert!(!library.is_smart().unwrap());
    assert_eq!(library.persistent_id().unwrap(), Some(0x2a));

    let recent = &mut lists[1];
    assert!(recent.is_smart().unwrap());
    assert!(!recent.is_special().unwrap());
    assert_eq!(recent.parent_id().unwrap(), Some(10));
    assert_eq!(recent.item_count().unwrap(), Some(3));
}

#[test]
fn items_get_then_drain_share_one_cursor() {
    let server = ScriptedServer::with_session(42, 7).route("databases/1/items", songs_body(5));
    let mut client = logged_in(server);

    let songs = client.items(&ItemsQuery::default()).unwrap();
    assert_eq!(songs.len(), Some(5));
    assert_eq!(songs.total(), Some(5));

    let mut cursor = songs.cursor();
    let mut first = cursor.get(Some(2));
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].name().unwrap().as_deref(), Some("Track 2"));

    let mut third = cursor.position().clone();
    assert_eq!(third.get("minm").unwrap(), Some(Value::Str("Track 3".into())));

    let mut rest = cursor.get(None);
    assert_eq!(rest.len(), 3);
    assert_eq!(rest[0].name().unwrap().as_deref(), Some("Track 3"));
    assert!(cursor.get(None).is_empty());
    assert!(cursor.next().is_none());
}

#[test]
fn items_iterator_and_get_advance_together() {
    let server = ScriptedServer::with_session(42, 7).route("databases/1/items", songs_body(4));
    let mut client = logged_in(server);
    let songs = client.items(&ItemsQuery::default()).unwrap();

    let mut cursor = songs.cursor();
    let mut first = cursor.next().unwrap();
    assert_eq!(first.track_number().unwrap(), Some(1));
    assert_eq!(cursor.get(Some(2)).len(), 2);
    let mut last = cursor.next().unwrap();
    assert_eq!(last.track_number().unwrap(), Some(4));
    assert!(cursor.next().is_none());

    // a new cursor starts over
    assert_eq!(songs.cursor().count(), 4);
}

#[test]
fn items_url_carries_meta_and_known_sort() {
    let server = ScriptedServer::with_session(42, 7).route("databases/2/items", songs_body(1));
    let mut client = logged_in(server);

    client.items(&ItemsQuery::new(2).sort("artist")).unwrap();
    let url = client.transport().last_url().to_owned();
    assert!(url.starts_with("http://127.0.0.1:3689/databases/2/items?session-id=42&revision-id=7&meta=dmap.itemid,dmap.itemname,"));
    assert!(url.contains("daap.songcomposer"));
    assert!(url.ends_with("daap.songyear&sort=artist"));

    client.items(&ItemsQuery::new(2).sort("rating")).unwrap();
    let url = client.transport().last_url();
    assert!(!url.contains("sort="));
    assert!(url.ends_with("daap.songyear"));
}

#[test]
fn songs_build_stream_urls() {
    let server = ScriptedServer::with_session(42, 7).route("databases/1/items", songs_body(1));
    let mut client = logged_in(server);
    let songs = client.items(&ItemsQuery::default()).unwrap();
    let mut song = songs.cursor().next().unwrap();
    assert_eq!(
        song.stream_url().unwrap().as_deref(),
        Some("http://127.0.0.1:3689/databases/1/items/100.mp3?session-id=42")
    );
    assert_eq!(song.artist().unwrap().as_deref(), Some("Miles Davis"));
    assert_eq!(song.to_json()["format"], "mp3");
}

#[test]
fn listing_skips_non_item_children() {
    let mut e = DmapEncoder::new();
    e.container("adbs", |e| {
        e.container("mlcl", |e| {
            e.i32("mstt", 200);
            e.container("mlit", |e| e.i32("miid", 1));
            e.i32("mstt", 200);
            e.container("mlit", |e| e.i32("miid", 2));
        });
    });
    let server = ScriptedServer::with_session(42, 7).route("databases/1/items", e.flush());
    let mut client = logged_in(server);
    let songs = client.items(&ItemsQuery::default()).unwrap();
    let ids: Vec<_> = songs.cursor().map(|mut s| s.id().unwrap()).collect();
    assert_eq!(ids, vec![Some(1), Some(2)]);
    // no mrco in this response
    assert_eq!(songs.len(), None);
}

#[test]
fn listing_without_items_is_empty() {
    let mut e = DmapEncoder::new();
    e.container("adbs", |e| {
        e.i32("mrco", 0);
        e.container("mlcl", |e| {
            e.i32("mstt", 200);
            e.i32("miid", 3);
        });
    });
    let server = ScriptedServer::with_session(42, 7).route("databases/1/items", e.flush());
    let mut client = logged_in(server);
    let songs = client.items(&ItemsQuery::default()).unwrap();
    assert!(songs.is_empty());
    assert_eq!(songs.cursor().count(), 0);
}

#[test]
fn empty_listing() {
    let mut e = DmapEncoder::new();
    e.container("avdb", |e| {
        e.i32("mrco", 0);
        e.container("mlcl", |_| {});
    });
    let server = ScriptedServer::with_session(42, 7).route("databases", e.flush());
    let mut client = logged_in(server);
    let databases = client.databases().unwrap();
    assert!(databases.is_empty());
    assert_eq!(databases.len(), Some(0));
    assert!(databases.cursor().get(None).is_empty());
}

#[test]
fn server_info_needs_no_session() {
    let mut client = client(ScriptedServer::new().route("server-info", server_info_body()));
    let info = client.server_info().unwrap();
    assert_eq!(info.name.as_deref(), Some("Jukebox"));
    assert_eq!(info.daap_version.as_deref(), Some("0.3.0.12"));
    assert_eq!(info.dmap_version.as_deref(), Some("0.2.0.10"));
    assert_eq!(info.timeout, Some(1800));
    assert_eq!(info.database_count, Some(1));
    assert_eq!(info.login_required, Some(true));
    assert_eq!(client.status(), Status::Disconnected);

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["name"], "Jukebox");
}

#[test]
fn content_codes_change_interpretation() {
    let server = ScriptedServer::new().route(
        "content-codes",
        content_codes_body(&[("abcd", "com.example.label", 9)]),
    );
    let mut client = client(server);

    let mut e = DmapEncoder::new();
    e.string("abcd", "hello");
    let frame = e.flush();

    let bootstrap = client.content_codes().clone();
    assert_eq!(bootstrap.kind("abcd"), None);
    assert!(Tag::decode(&frame, 0, &bootstrap).unwrap().value().is_err());

    client.update_content_codes().unwrap();
    let codes = client.content_codes().clone();
    assert_eq!(codes.kind("abcd"), Some(DecodeKind::String));
    let tag = Tag::decode(&frame, 0, &codes).unwrap();
    assert_eq!(tag.value().unwrap(), Some(Value::Str("hello".into())));

    // the old table is untouched
    assert_eq!(bootstrap.kind("abcd"), None);
}

#[test]
fn content_codes_without_dictionary_keep_the_table() {
    let mut e = DmapEncoder::new();
    e.container("mccr", |e| e.i32("mstt", 200));
    let mut client = client(ScriptedServer::new().route("content-codes", e.flush()));
    let before = client.content_codes().clone();
    client.update_content_codes().unwrap();
    assert!(std::sync::Arc::ptr_eq(&before, client.content_codes()));
}

#[test]
fn negotiated_codes_decode_later_responses() {
    // server declares mlid as a u32 and adds a private string field
    let server = ScriptedServer::new()
        .route(
            "content-codes",
            content_codes_body(&[
                ("mlog", "dmap.loginresponse", 12),
                ("mlid", "dmap.sessionid", 6),
                ("mupd", "dmap.updateresponse", 12),
                ("musr", "dmap.serverrevision", 5),
                ("xnot", "com.example.note", 9),
            ]),
        )
        .route("login", {
            let mut e = DmapEncoder::new();
            e.container("mlog", |e| {
                e.u32("mlid", 0xffff_fff0);
                e.string("xnot", "welcome");
            });
            e.flush()
        })
        .route("update", update_body(3));
    let mut client = client(server);
    client.update_content_codes().unwrap();
    client.login(None).unwrap();
    assert_eq!(client.session_id(), Some(0xffff_fff0));
}

#[test]
fn closures_act_as_transports() {
    let mut seen = Vec::new();
    let transport = |request: &Request| -> Result<Vec<u8>, RequestError> {
        seen.push(request.url.clone());
        if request.url.ends_with("/login") {
            Ok(login_body(9))
        } else {
            Ok(update_body(2))
        }
    };
    let mut client = DaapClient::new(ClientConfig::default(), transport);
    client.login(None).unwrap();
    assert_eq!(client.session_id(), Some(9));
    drop(client);
    assert_eq!(seen.len(), 2);
}

#[test]
fn config_loads_from_toml() {
    let config: ClientConfig = toml::from_str(
        r#"
        server = "192.168.1.20"
        password = "hunter2"
        "#,
    )
    .unwrap();
    assert_eq!(config.port, 3689);
    assert_eq!(config.timeout_ms, 10_000);
    assert_eq!(config.base_url(), "http://192.168.1.20:3689/");

    let client = DaapClient::new(config, ScriptedServer::new());
    assert_eq!(client.base_url(), "http://192.168.1.20:3689/");
    assert_eq!(client.config().password.as_deref(), Some("hunter2"));
}

#[test]
fn status_display_and_readiness() {
    assert_eq!(Status::HasRevision.to_string(), "HasRevision");
    assert!(Status::HasRevision.is_ready());
    assert!(!Status::HasSession.is_ready());
    let err = DaapError::InvalidState {
        status: Status::Connecting,
        operation: "login",
    };
    assert_eq!(err.to_string(), "invalid status Connecting for login");
}
