mod json;
mod roundtrip;
