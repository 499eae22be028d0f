//! Encode/decode round trips across the supported types, plus decoding of
//! malformed array images.
use std::net::{IpAddr, Ipv4Addr};

use bytes::BytesMut;
use pgcodec::{Decode, Encode, WText};
use time::macros::{date, datetime};

fn image<T: Encode>(value: &T) -> BytesMut {
    let mut buf = BytesMut::new();
    value.encode(&mut buf);
    buf
}

fn roundtrip<T>(value: T)
where
    T: Encode + Decode + PartialEq + std::fmt::Debug,
{
    assert_eq!(T::decode(&image(&value)), value);
}

#[test]
fn scalars_round_trip() {
    roundtrip(false);
    roundtrip(true);
    roundtrip(-1413i16);
    roundtrip(i16::MIN);
    roundtrip(i16::MAX);
    roundtrip(123_342_945i32);
    roundtrip(-123_342_945_112_312_323i64);
    roundtrip(-1656e-8f32);
    roundtrip(2354e15f64);
    roundtrip(f64::MIN_POSITIVE);
}

#[test]
fn text_and_bytes_round_trip() {
    roundtrip(String::from("This is a test!!34234"));
    roundtrip(String::new());
    roundtrip(b"abcdef".to_vec());
    roundtrip(WText::from("インターネット"));
    roundtrip(WText::from("ᚺᛖᛚᛟ ᚹᛟᛉᛚᛞ"));
}

#[test]
fn timestamps_round_trip() {
    roundtrip(datetime!(2000-01-01 0:00 UTC));
    roundtrip(datetime!(2022-02-16 12:34:56.789012 UTC));
    roundtrip(datetime!(1969-07-20 20:17:40 UTC));
    roundtrip(date!(2000-01-01));
    roundtrip(date!(2022-02-16));
    roundtrip(date!(1969-07-20));
}

#[test]
fn arrays_round_trip() {
    roundtrip(vec![14662i16, 5312, -5209, 24755, -17290]);
    roundtrip(vec![123_342_945i32, -1]);
    roundtrip(vec![-123_342_945_112_312_323i64]);
    roundtrip(vec![-1656e-8f32, 0.5]);
    roundtrip(vec![2354e15f64, -2354e15]);
    roundtrip(vec![
        String::from("The Fellowship of the Ring"),
        String::from("The Two Towers"),
        String::from("The Return of the King"),
    ]);
    roundtrip(vec![
        WText::from("三体"),
        WText::from("黑暗森林"),
        WText::from("死神永生"),
    ]);
    roundtrip(Vec::<i16>::new());
    roundtrip(Vec::<String>::new());
}

#[test]
fn ipv6_addresses_round_trip() {
    let v6: IpAddr = "cc22:4008:79a1:c178:5c5:882a:190d:7fbf".parse().unwrap();
    roundtrip(v6);
}

#[test]
fn ipv4_addresses_decode_to_the_mapped_form() {
    let v4 = Ipv4Addr::new(179, 124, 131, 145);
    let decoded = IpAddr::decode(&image(&IpAddr::V4(v4)));
    assert_eq!(decoded, IpAddr::V6(v4.to_ipv6_mapped()));
}

#[test]
fn inet_decodes_the_short_server_form() {
    // 8-byte IPv4 image as sent by the server
    let raw = [2u8, 32, 0, 4, 179, 124, 131, 145];
    let decoded = IpAddr::decode(&raw);
    assert_eq!(
        decoded,
        IpAddr::V6(Ipv4Addr::new(179, 124, 131, 145).to_ipv6_mapped())
    );

    // any other length leaves the address unspecified
    let decoded = IpAddr::decode(&[1, 2, 3]);
    assert_eq!(decoded, "::".parse::<IpAddr>().unwrap());
}

#[test]
fn malformed_array_headers_decode_empty() {
    let good = image(&vec![14662i16, 5312]);

    let mut ndim = good.clone();
    ndim[0..4].copy_from_slice(&2i32.to_be_bytes());
    assert_eq!(Vec::<i16>::decode(&ndim), Vec::<i16>::new());

    let mut has_null = good.clone();
    has_null[4..8].copy_from_slice(&1i32.to_be_bytes());
    assert_eq!(Vec::<i16>::decode(&has_null), Vec::<i16>::new());

    let mut element_oid = good.clone();
    element_oid[8..12].copy_from_slice(&23i32.to_be_bytes());
    assert_eq!(Vec::<i16>::decode(&element_oid), Vec::<i16>::new());

    assert_eq!(Vec::<i16>::decode(&good[..10]), Vec::<i16>::new());
    assert_eq!(Vec::<String>::decode(&[]), Vec::<String>::new());
}

#[test]
fn wrong_sized_array_elements_are_skipped() {
    #[rustfmt::skip]
    let raw: Vec<u8> = vec![
        0, 0, 0, 1,
        0, 0, 0, 0,
        0, 0, 0, 21,
        0, 0, 0, 3,
        0, 0, 0, 1,
        0, 0, 0, 4, 0xAA, 0xBB, 0xCC, 0xDD, // wrong size, skipped
        0, 0, 0, 2, 0x39, 0x46,
        0, 0, 0, 2, 0x14, 0xC0,
    ];
    assert_eq!(Vec::<i16>::decode(&raw), vec![14662, 5312]);
}

#[test]
fn truncated_text_arrays_keep_the_decoded_prefix() {
    let full = image(&vec![String::from("one"), String::from("two")]);
    // cut into the second element's payload
    let cut = &full[..full.len() - 2];
    assert_eq!(Vec::<String>::decode(cut), vec![String::from("one")]);
}

#[test]
fn invalid_utf8_abandons_a_wide_text_array() {
    let mut buf = BytesMut::new();
    vec![String::from("ok"), String::from("xx"), String::from("tail")].encode(&mut buf);
    // corrupt the second element's payload
    buf[30] = 0xFF;
    buf[31] = 0xFE;
    let decoded = Vec::<WText>::decode(&buf);
    assert_eq!(decoded, vec![WText::from("ok")]);
}
