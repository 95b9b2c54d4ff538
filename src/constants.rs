/// BMP 文件的标准头部大小 (字节)。
/// 头部按原样复制，从不解析；隐写从其后的像素数据开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// 每个载体字节只使用最低有效位，因此隐藏一个数据字节需要 8 个载体字节。
pub const CARRIERS_PER_BYTE: usize = 8;

/// 长度字段是 `u32` (32 bits)，每个载体字节存储 1 bit，
/// 因此需要 32 个载体字节来隐藏一个长度。
pub const CARRIERS_PER_LENGTH: usize = 32;

/// 长度字段在记录中占用的数据字节数。
pub const LENGTH_FIELD_SIZE: usize = 4;

/// 写在记录最前面的魔数字符串，用于识别由本工具生成的图像。
pub const MAGIC_STRING: &str = "#*";

/// 载体图像必须具有的扩展名。
pub const CARRIER_EXTENSION: &str = "bmp";

/// 未指定输出路径时，隐写图像的默认文件名。
pub const DEFAULT_STEGO_FILE_NAME: &str = "output.bmp";

/// 未指定输出路径时，恢复文件的默认文件名主干 (扩展名取自图像中的记录)。
pub const DEFAULT_SECRET_FILE_STEM: &str = "secret_output";
